//! Report command implementations

use std::path::Path;

use advisor_core::{Config, Report, ReportFilter, ReportRequest, ReportType};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::{read_document, truncate};

/// Reports matching the search and type filter
pub fn filter_reports(
    reports: Vec<Report>,
    search: Option<&str>,
    report_type: Option<&str>,
) -> Result<Vec<Report>> {
    let report_type = report_type
        .filter(|t| !t.eq_ignore_ascii_case("all"))
        .map(|t| t.parse::<ReportType>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let filter = ReportFilter::new().search(search).report_type(report_type);
    Ok(filter.apply(&reports).into_iter().cloned().collect())
}

pub fn cmd_reports_list(file: &Path, search: Option<&str>, report_type: Option<&str>) -> Result<()> {
    let reports: Vec<Report> = read_document(file)?;
    let total = reports.len();
    let matched = filter_reports(reports, search, report_type)?;

    println!();
    println!("📄 Reports ({} of {})", matched.len(), total);
    println!("   ─────────────────────────────────────────────────────────────");

    if matched.is_empty() {
        println!("   No reports match.");
        return Ok(());
    }

    println!(
        "   {:>4} │ {:40} │ {:10} │ {:10} │ {:9}",
        "ID", "Title", "Type", "Date", "Status"
    );
    println!("   ─────┼──────────────────────────────────────────┼────────────┼────────────┼──────────");

    for report in &matched {
        println!(
            "   {:>4} │ {:40} │ {:10} │ {:10} │ {:9}",
            report.id,
            truncate(&report.title, 40),
            report.report_type.as_str(),
            report.date,
            report.status.as_str()
        );
    }

    Ok(())
}

/// Listing entry for a generation request, using the configured status
pub fn new_report(
    config: &Config,
    request: ReportRequest,
    id: i64,
    date: Option<&str>,
) -> Result<Report> {
    let date = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .context("Invalid --date format (use YYYY-MM-DD)")?,
        None => Utc::now().date_naive(),
    };

    debug!(
        template = request.template.as_str(),
        include_charts = request.include_charts,
        include_ratios = request.include_ratios,
        include_recommendations = request.include_recommendations,
        date_range = ?request.date_range,
        "Report request"
    );

    request
        .into_report(id, date, config.reports.default_status)
        .context("Report request is incomplete")
}

pub fn cmd_reports_new(config: &Config, file: &Path, id: i64, date: Option<&str>) -> Result<()> {
    let request: ReportRequest = read_document(file)?;
    let report = new_report(config, request, id, date)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
