//! Report listing search and generation requests
//!
//! Report documents themselves are rendered elsewhere; this module only deals
//! with the list of report entries and the request that adds one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Report, ReportStatus, ReportType};

/// Builder for filtering the report list
///
/// The lifetime `'query` ties the filter to the borrowed search term.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportFilter<'query> {
    pub search: Option<&'query str>,
    pub report_type: Option<ReportType>,
}

impl<'query> ReportFilter<'query> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on title or client
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    /// Only reports of this type (`None` = all types)
    pub fn report_type(mut self, report_type: Option<ReportType>) -> Self {
        self.report_type = report_type;
        self
    }

    pub fn matches(&self, report: &Report) -> bool {
        let matches_search = match self.search {
            Some(query) => {
                let query = query.to_lowercase();
                report.title.to_lowercase().contains(&query)
                    || report.client.to_lowercase().contains(&query)
            }
            None => true,
        };

        let matches_type = self
            .report_type
            .map_or(true, |wanted| report.report_type == wanted);

        matches_search && matches_type
    }

    /// Matching reports, in list order
    pub fn apply<'r>(&self, reports: &'r [Report]) -> Vec<&'r Report> {
        let matched: Vec<&Report> = reports.iter().filter(|r| self.matches(r)).collect();
        debug!(
            search = ?self.search,
            report_type = ?self.report_type,
            total = reports.len(),
            matched = matched.len(),
            "Filtered reports"
        );
        matched
    }
}

/// Layout used when the report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportTemplate {
    /// Professional layout with charts and tables
    #[default]
    Standard,
    /// Condensed format for executive review
    Executive,
}

impl ReportTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Executive => "executive",
        }
    }
}

fn default_true() -> bool {
    true
}

/// Request to generate a new report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub report_type: Option<ReportType>,
    /// Free text such as "Q4 2024"
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default = "default_true")]
    pub include_charts: bool,
    #[serde(default = "default_true")]
    pub include_ratios: bool,
    #[serde(default = "default_true")]
    pub include_recommendations: bool,
    #[serde(default)]
    pub template: ReportTemplate,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            title: String::new(),
            client: String::new(),
            report_type: None,
            date_range: None,
            include_charts: true,
            include_ratios: true,
            include_recommendations: true,
            template: ReportTemplate::Standard,
        }
    }
}

impl ReportRequest {
    /// Client and report type are required; a blank title is filled in later
    pub fn validate(&self) -> Result<ReportType> {
        let mut missing = Vec::new();
        if self.client.trim().is_empty() {
            missing.push("Client is required".to_string());
        }
        let Some(report_type) = self.report_type else {
            missing.push("Report type is required".to_string());
            return Err(Error::Validation(missing));
        };
        if !missing.is_empty() {
            return Err(Error::Validation(missing));
        }
        Ok(report_type)
    }

    /// Title used for the listing entry
    pub fn resolved_title(&self, report_type: ReportType) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            format!("{} - {}", report_type.label(), self.client.trim())
        } else {
            title.to_string()
        }
    }

    /// Listing entry for this request
    ///
    /// Until a document has been rendered the entry has no size.
    pub fn into_report(self, id: i64, date: NaiveDate, status: ReportStatus) -> Result<Report> {
        let report_type = self.validate()?;
        Ok(Report {
            id,
            title: self.resolved_title(report_type),
            report_type,
            client: self.client.trim().to_string(),
            date,
            size: None,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: i64, title: &str, report_type: ReportType, client: &str) -> Report {
        Report {
            id,
            title: title.to_string(),
            report_type,
            client: client.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            size: Some("2.0 MB".to_string()),
            status: ReportStatus::Completed,
        }
    }

    fn sample_reports() -> Vec<Report> {
        vec![
            report(1, "Q4 2024 Financial Analysis - ABC Corp", ReportType::Quarterly, "ABC Corp"),
            report(2, "Annual Review - Tech Innovations Inc", ReportType::Annual, "Tech Innovations Inc"),
            report(3, "Loan Application Analysis - StartupXYZ", ReportType::Loan, "StartupXYZ"),
            report(4, "Investment Analysis - GreenTech Solutions", ReportType::Investment, "GreenTech Solutions"),
            report(5, "Risk Assessment - Manufacturing Co", ReportType::Risk, "Manufacturing Co"),
        ]
    }

    fn ids(reports: &[&Report]) -> Vec<i64> {
        reports.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let reports = sample_reports();
        assert_eq!(ReportFilter::new().apply(&reports).len(), 5);
        assert_eq!(ReportFilter::new().search(Some("")).apply(&reports).len(), 5);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let reports = sample_reports();
        let found = ReportFilter::new().search(Some("analysis")).apply(&reports);
        assert_eq!(ids(&found), vec![1, 3, 4]);

        let found = ReportFilter::new().search(Some("STARTUP")).apply(&reports);
        assert_eq!(ids(&found), vec![3]);
    }

    #[test]
    fn test_search_matches_client_only() {
        let mut reports = sample_reports();
        reports[0].title = "Quarterly numbers".to_string();
        let found = ReportFilter::new().search(Some("abc")).apply(&reports);
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn test_type_and_search_combine() {
        let reports = sample_reports();
        let found = ReportFilter::new()
            .search(Some("analysis"))
            .report_type(Some(ReportType::Investment))
            .apply(&reports);
        assert_eq!(ids(&found), vec![4]);

        let found = ReportFilter::new()
            .search(Some("abc"))
            .report_type(Some(ReportType::Risk))
            .apply(&reports);
        assert!(found.is_empty());
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: ReportRequest =
            serde_json::from_str(r#"{"client": "ABC Corp", "reportType": "annual"}"#).unwrap();
        assert!(request.include_charts);
        assert!(request.include_ratios);
        assert!(request.include_recommendations);
        assert_eq!(request.template, ReportTemplate::Standard);
    }

    #[test]
    fn test_request_validation() {
        match ReportRequest::default().validate() {
            Err(Error::Validation(messages)) => assert_eq!(messages.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }

        let request = ReportRequest {
            client: "ABC Corp".into(),
            ..Default::default()
        };
        match request.validate() {
            Err(Error::Validation(messages)) => {
                assert_eq!(messages, vec!["Report type is required"])
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_report_fills_title() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();
        let request = ReportRequest {
            client: " StartupXYZ ".into(),
            report_type: Some(ReportType::Loan),
            ..Default::default()
        };
        let report = request.into_report(6, date, ReportStatus::Pending).unwrap();

        assert_eq!(report.title, "Loan Application - StartupXYZ");
        assert_eq!(report.client, "StartupXYZ");
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.size, None);

        let request = ReportRequest {
            title: "Custom".into(),
            client: "ABC Corp".into(),
            report_type: Some(ReportType::Risk),
            template: ReportTemplate::Executive,
            ..Default::default()
        };
        assert_eq!(request.into_report(7, date, ReportStatus::Draft).unwrap().title, "Custom");
    }
}
