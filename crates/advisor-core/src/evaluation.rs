//! Evaluation drafts
//!
//! An [`EvaluationDraft`] is the state behind the evaluation form. It owns
//! the raw values, routes every edit through the metrics engine so derived
//! totals are never stale, and turns into an [`Evaluation`] on submit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::metrics::{self, EvaluationRecord, RawField};
use crate::models::{optional_date, Client, Evaluation, EvaluationType};

/// A required field that is missing on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Document name of the offending field
    pub field: &'static str,
    pub message: &'static str,
}

/// In-progress evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDraft {
    #[serde(default, deserialize_with = "optional_id")]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default, with = "optional_date")]
    pub evaluation_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_evaluation_type")]
    pub evaluation_type: Option<EvaluationType>,
    #[serde(flatten)]
    pub record: EvaluationRecord,
    #[serde(default)]
    pub life_policy_info: Option<String>,
    #[serde(default)]
    pub debt_list: Option<String>,
    #[serde(default)]
    pub debt_strategy: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
}

impl EvaluationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change one raw amount and refresh the totals that depend on it
    pub fn edit(&mut self, field: RawField, value: &str) {
        self.record = metrics::apply_edit(&self.record, field, value);
        debug!(
            field = field.as_str(),
            group = field.group().as_str(),
            monthly_income = self.record.monthly_income,
            monthly_expenses = self.record.monthly_expenses,
            net_income = self.record.net_income,
            net_worth = self.record.net_worth,
            coverage_needed = self.record.coverage_needed,
            "Applied edit"
        );
    }

    /// Resolve `client_id` against `clients` and copy the client's name
    pub fn select_client<'c>(&mut self, clients: &'c [Client]) -> Result<&'c Client> {
        let id = self
            .client_id
            .ok_or_else(|| Error::InvalidData("No client selected".to_string()))?;

        let client = clients
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("Client {}", id)))?;

        self.client_name = Some(client.display_name());
        debug!(client_id = id, client_name = ?self.client_name, "Selected client");
        Ok(client)
    }

    /// Required-field check performed on submit
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.client_id.is_none() {
            errors.push(FieldError {
                field: "clientId",
                message: "Client is required",
            });
        }
        if self.evaluation_date.is_none() {
            errors.push(FieldError {
                field: "evaluationDate",
                message: "Evaluation date is required",
            });
        }
        if self.evaluation_type.is_none() {
            errors.push(FieldError {
                field: "evaluationType",
                message: "Evaluation type is required",
            });
        }
        errors
    }

    /// Validate and produce the evaluation to persist
    ///
    /// `id` and `created_at` are supplied by the caller. The record gets a
    /// full recompute pass first.
    pub fn submit(self, id: i64, created_at: DateTime<Utc>) -> Result<Evaluation> {
        let errors = self.validate();

        let (Some(client_id), Some(evaluation_date), Some(evaluation_type)) =
            (self.client_id, self.evaluation_date, self.evaluation_type)
        else {
            return Err(Error::Validation(
                errors.iter().map(|e| e.message.to_string()).collect(),
            ));
        };

        let client_name = self
            .client_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("Client #{}", client_id));

        let record = metrics::recompute_all(&self.record);

        info!(
            id,
            client_id,
            evaluation_type = evaluation_type.as_str(),
            net_income = record.net_income,
            net_worth = record.net_worth,
            "Evaluation submitted"
        );

        Ok(Evaluation {
            id,
            client_id,
            client_name,
            evaluation_date,
            evaluation_type,
            record,
            life_policy_info: non_empty(self.life_policy_info),
            debt_list: non_empty(self.debt_list),
            debt_strategy: non_empty(self.debt_strategy),
            goals: non_empty(self.goals),
            created_at,
        })
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// The form's select holds client ids as strings ("" when unselected).
fn optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Number(n)) => Ok(Some(n)),
        Some(Id::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Id::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("Invalid client id: {}", s))),
        None => Ok(None),
    }
}

fn optional_evaluation_type<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<EvaluationType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clients() -> Vec<Client> {
        vec![
            Client {
                id: 1,
                company: Some("ABC Corp".into()),
                industry: Some("technology".into()),
                ..Default::default()
            },
            Client {
                id: 2,
                first_name: Some("Maria".into()),
                last_name: Some("Lopez".into()),
                ..Default::default()
            },
        ]
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_edit_keeps_totals_current() {
        let mut draft = EvaluationDraft::new();
        draft.edit(RawField::PersonalIncome, "5000");
        draft.edit(RawField::SpouseIncome, "2000");
        draft.edit(RawField::RentMortgage, "1500");
        draft.edit(RawField::Groceries, "400");

        assert_eq!(draft.record.monthly_income, 7000.0);
        assert_eq!(draft.record.monthly_expenses, 1900.0);
        assert_eq!(draft.record.net_income, 5100.0);
    }

    #[test]
    fn test_select_client() {
        let mut draft = EvaluationDraft {
            client_id: Some(2),
            ..Default::default()
        };
        let list = clients();
        let client = draft.select_client(&list).unwrap();
        // The returned client borrows the list, not the draft
        assert_eq!(draft.client_name.as_deref(), Some("Maria Lopez"));
        assert_eq!(client.id, 2);

        draft.client_id = Some(99);
        assert!(matches!(
            draft.select_client(&list),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let errors = EvaluationDraft::new().validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["clientId", "evaluationDate", "evaluationType"]);

        match EvaluationDraft::new().submit(1, created_at()) {
            Err(Error::Validation(messages)) => {
                assert_eq!(
                    messages,
                    vec![
                        "Client is required",
                        "Evaluation date is required",
                        "Evaluation type is required"
                    ]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_recomputes_record() {
        let mut draft = EvaluationDraft {
            client_id: Some(1),
            evaluation_date: NaiveDate::from_ymd_opt(2024, 12, 15),
            evaluation_type: Some(EvaluationType::Annual),
            goals: Some("Retire at 60".into()),
            debt_list: Some("   ".into()),
            ..Default::default()
        };
        let list = clients();
        draft.select_client(&list).unwrap();
        // Written directly, bypassing edit(); submit must still catch it
        draft.record.set(RawField::BsAssets, "300000");
        draft.record.set(RawField::BsLiabilities, "120000");

        let expected = metrics::recompute_all(&draft.record);
        let evaluation = draft.submit(1734258600000, created_at()).unwrap();

        assert_eq!(evaluation.id, 1734258600000);
        assert_eq!(evaluation.client_name, "ABC Corp");
        assert_eq!(evaluation.record, expected);
        assert_eq!(evaluation.record.net_worth, 180000.0);
        assert_eq!(evaluation.goals.as_deref(), Some("Retire at 60"));
        assert_eq!(evaluation.debt_list, None);
        assert_eq!(evaluation.created_at, created_at());
    }

    #[test]
    fn test_submit_without_selected_name_uses_placeholder() {
        let draft = EvaluationDraft {
            client_id: Some(5),
            evaluation_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            evaluation_type: Some(EvaluationType::Loan),
            ..Default::default()
        };
        let evaluation = draft.submit(10, created_at()).unwrap();
        assert_eq!(evaluation.client_name, "Client #5");
    }

    #[test]
    fn test_draft_from_form_json() {
        let json = r#"{
            "clientId": "3",
            "clientName": "",
            "evaluationDate": "2024-12-08",
            "evaluationType": "loan",
            "personalIncome": "4000",
            "groceries": "350",
            "monthlyIncome": "",
            "goals": ""
        }"#;
        let draft: EvaluationDraft = serde_json::from_str(json).unwrap();

        assert_eq!(draft.client_id, Some(3));
        assert_eq!(draft.evaluation_type, Some(EvaluationType::Loan));
        assert_eq!(draft.record.personal_income.as_deref(), Some("4000"));
        assert_eq!(draft.record.monthly_income, 0.0);
        assert!(draft.validate().is_empty());

        let blank: EvaluationDraft =
            serde_json::from_str(r#"{"clientId": "", "evaluationType": ""}"#).unwrap();
        assert_eq!(blank.client_id, None);
        assert_eq!(blank.evaluation_type, None);
    }

    #[test]
    fn test_submitted_evaluation_json_shape() {
        let mut draft = EvaluationDraft {
            client_id: Some(1),
            client_name: Some("ABC Corp".into()),
            evaluation_date: NaiveDate::from_ymd_opt(2024, 12, 15),
            evaluation_type: Some(EvaluationType::Quarterly),
            ..Default::default()
        };
        draft.edit(RawField::CoverageIncome, "60000");
        draft.edit(RawField::CoverageYears, "10");

        let evaluation = draft.submit(42, created_at()).unwrap();
        let value = serde_json::to_value(&evaluation).unwrap();

        assert_eq!(value["id"], 42);
        assert_eq!(value["evaluationType"], "quarterly");
        assert_eq!(value["evaluationDate"], "2024-12-15");
        assert_eq!(value["coverageIncome"], "60000");
        assert_eq!(value["coverageNeeded"], 600000.0);

        let back: Evaluation = serde_json::from_value(value).unwrap();
        assert_eq!(back, evaluation);
    }
}
