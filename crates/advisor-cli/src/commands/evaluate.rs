//! Evaluation command implementations (evaluate, edit, submit)

use std::path::Path;

use advisor_core::{
    metrics, Client, Config, Evaluation, EvaluationDraft, EvaluationRecord, FieldGroup, RawField,
};
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, warn};

use super::{read_document, truncate};

/// Split a `field=value` argument
pub fn parse_assignment(assignment: &str) -> Result<(RawField, String)> {
    let (field, value) = assignment
        .split_once('=')
        .with_context(|| format!("Expected FIELD=VALUE, got '{}'", assignment))?;
    let field: RawField = field.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    Ok((field, value.trim().to_string()))
}

/// Apply each assignment in order through the per-group recompute path
pub fn apply_assignments(
    record: &EvaluationRecord,
    assignments: &[String],
) -> Result<EvaluationRecord> {
    let mut record = record.clone();
    for assignment in assignments {
        let (field, value) = parse_assignment(assignment)?;
        debug!(field = field.as_str(), value = %value, "Applying edit");
        record = metrics::apply_edit(&record, field, &value);
    }
    Ok(record)
}

pub fn cmd_evaluate(config: &Config, file: &Path, json: bool) -> Result<()> {
    let record: EvaluationRecord = read_document(file)?;

    let recomputed = metrics::recompute_all(&record);
    if recomputed.derived() != record.derived() {
        debug!("Stored totals were stale and have been recomputed");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recomputed)?);
    } else {
        print_summary(config, &recomputed);
    }
    Ok(())
}

pub fn cmd_edit(config: &Config, file: &Path, assignments: &[String], json: bool) -> Result<()> {
    let record: EvaluationRecord = read_document(file)?;
    // Start from consistent totals so per-group passes don't inherit stale ones
    let record = metrics::recompute_all(&record);
    let edited = apply_assignments(&record, assignments)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&edited)?);
    } else {
        print_summary(config, &edited);
    }
    Ok(())
}

/// Validate a draft and build the evaluation to store
pub fn submit_draft(
    mut draft: EvaluationDraft,
    clients: Option<&[Client]>,
    id: Option<i64>,
) -> Result<Evaluation> {
    if let (Some(clients), Some(_)) = (clients, draft.client_id) {
        draft
            .select_client(clients)
            .context("Failed to resolve client")?;
    }

    let now = Utc::now();
    let id = id.unwrap_or_else(|| now.timestamp_millis());

    for error in draft.validate() {
        warn!(field = error.field, "{}", error.message);
    }

    draft.submit(id, now).context("Evaluation is incomplete")
}

pub fn cmd_submit(file: &Path, clients_file: Option<&Path>, id: Option<i64>) -> Result<()> {
    let draft: EvaluationDraft = read_document(file)?;
    let clients = clients_file
        .map(read_document::<Vec<Client>>)
        .transpose()?;

    let evaluation = submit_draft(draft, clients.as_deref(), id)?;
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}

/// Print the raw line items and derived totals of a record
pub fn print_summary(config: &Config, record: &EvaluationRecord) {
    println!();
    println!("📊 Evaluation Summary");
    println!("   ─────────────────────────────────────────────────────────────");

    for group in FieldGroup::all() {
        let entered: Vec<(RawField, &str)> = group
            .fields()
            .iter()
            .filter_map(|field| record.get(*field).map(|value| (*field, value)))
            .collect();
        if entered.is_empty() {
            continue;
        }

        println!("   {}", group_title(*group));
        for (field, value) in entered {
            let amount = metrics::coerce_number(Some(value));
            println!(
                "     {:26} │ {:>16}",
                field.label(),
                if field == RawField::CoverageYears {
                    truncate(value, 16)
                } else {
                    config.format_amount(amount)
                }
            );
        }
    }

    println!("   ─────────────────────────────────────────────────────────────");
    for (label, value) in record.derived().rows() {
        println!("   {:28} │ {:>16}", label, config.format_amount(value));
    }
}

fn group_title(group: FieldGroup) -> &'static str {
    match group {
        FieldGroup::Income => "Income",
        FieldGroup::Expenses => "Expenses",
        FieldGroup::BalanceSheet => "Balance Sheet",
        FieldGroup::Coverage => "Life Insurance Calculator",
    }
}
