//! Domain models for Advisor

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::EvaluationRecord;

/// A client captured through the intake form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, with = "optional_enum")]
    pub gender: Option<Gender>,
    #[serde(default, with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, with = "optional_enum")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default)]
    pub spouse: Option<Spouse>,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Client {
    /// Name shown in pickers and on evaluations
    ///
    /// "First Last" when either part is present, otherwise the company, and
    /// finally a placeholder built from the id.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if !parts.is_empty() {
            return parts.join(" ");
        }

        match self.company.as_deref().map(str::trim) {
            Some(company) if !company.is_empty() => company.to_string(),
            _ => format!("Client #{}", self.id),
        }
    }

    /// Spouse details, only when the client is married
    pub fn spouse(&self) -> Option<&Spouse> {
        match self.marital_status {
            Some(MaritalStatus::Married) => self.spouse.as_ref(),
            _ => None,
        }
    }
}

/// Spouse details on a client record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spouse {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A dependent child on a client record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Child {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "optional_date")]
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
            Self::Divorced => "divorced",
            Self::Widowed => "widowed",
        }
    }
}

impl std::str::FromStr for MaritalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "married" => Ok(Self::Married),
            "divorced" => Ok(Self::Divorced),
            "widowed" => Ok(Self::Widowed),
            _ => Err(format!("Unknown marital status: {}", s)),
        }
    }
}

impl std::fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Purpose of a financial evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationType {
    Annual,
    Quarterly,
    Loan,
    Investment,
    Merger,
}

impl EvaluationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
            Self::Loan => "loan",
            Self::Investment => "investment",
            Self::Merger => "merger",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Annual => "Annual Review",
            Self::Quarterly => "Quarterly Assessment",
            Self::Loan => "Loan Application",
            Self::Investment => "Investment Analysis",
            Self::Merger => "Merger & Acquisition",
        }
    }
}

impl std::str::FromStr for EvaluationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "annual" => Ok(Self::Annual),
            "quarterly" => Ok(Self::Quarterly),
            "loan" => Ok(Self::Loan),
            "investment" => Ok(Self::Investment),
            "merger" | "m&a" => Ok(Self::Merger),
            _ => Err(format!("Unknown evaluation type: {}", s)),
        }
    }
}

impl std::fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitted evaluation, ready to hand to whatever stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub evaluation_date: NaiveDate,
    pub evaluation_type: EvaluationType,
    #[serde(flatten)]
    pub record: EvaluationRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_policy_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Kind of report in the report list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Quarterly,
    Annual,
    Loan,
    Investment,
    Risk,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
            Self::Loan => "loan",
            Self::Investment => "investment",
            Self::Risk => "risk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Quarterly => "Quarterly Analysis",
            Self::Annual => "Annual Review",
            Self::Loan => "Loan Application",
            Self::Investment => "Investment Analysis",
            Self::Risk => "Risk Assessment",
        }
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quarterly" => Ok(Self::Quarterly),
            "annual" => Ok(Self::Annual),
            "loan" => Ok(Self::Loan),
            "investment" => Ok(Self::Investment),
            "risk" => Ok(Self::Risk),
            _ => Err(format!("Unknown report type: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of a report listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Completed,
    #[default]
    Pending,
    Draft,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Draft => "draft",
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "draft" => Ok(Self::Draft),
            _ => Err(format!("Unknown report status: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entry in the report list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub client: String,
    pub date: NaiveDate,
    /// Display size of the rendered document, e.g. "2.4 MB"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
}

/// Forms submit "" for unselected dropdowns; treat that as absent.
mod optional_enum {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr<Err = String>,
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

/// Same as `optional_enum` for ISO dates.
pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let mut client = Client {
            id: 7,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            company: Some("Analytical Engines".into()),
            ..Default::default()
        };
        assert_eq!(client.display_name(), "Ada Lovelace");

        client.last_name = Some("  ".into());
        assert_eq!(client.display_name(), "Ada");

        client.first_name = None;
        client.last_name = None;
        assert_eq!(client.display_name(), "Analytical Engines");

        client.company = None;
        assert_eq!(client.display_name(), "Client #7");
    }

    #[test]
    fn test_spouse_only_when_married() {
        let mut client = Client {
            id: 1,
            marital_status: Some(MaritalStatus::Single),
            spouse: Some(Spouse {
                first_name: Some("Sam".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(client.spouse().is_none());

        client.marital_status = Some(MaritalStatus::Married);
        assert_eq!(
            client.spouse().and_then(|s| s.first_name.as_deref()),
            Some("Sam")
        );
    }

    #[test]
    fn test_client_from_intake_form_json() {
        let json = r#"{
            "id": 1718000000000,
            "firstName": "John",
            "lastName": "Smith",
            "gender": "",
            "dateOfBirth": "1980-04-02",
            "maritalStatus": "married",
            "spouse": {"firstName": "Jane", "lastName": "Smith", "dateOfBirth": ""},
            "children": [{"name": "Max", "dob": "2012-09-30"}],
            "zipCode": "94110"
        }"#;
        let client: Client = serde_json::from_str(json).unwrap();

        assert_eq!(client.gender, None);
        assert_eq!(client.date_of_birth, NaiveDate::from_ymd_opt(1980, 4, 2));
        assert_eq!(client.marital_status, Some(MaritalStatus::Married));
        assert_eq!(client.spouse().unwrap().date_of_birth, None);
        assert_eq!(client.children.len(), 1);
        assert_eq!(client.zip_code.as_deref(), Some("94110"));
    }

    #[test]
    fn test_enum_round_trip_names() {
        for t in ["annual", "quarterly", "loan", "investment", "merger"] {
            assert_eq!(t.parse::<EvaluationType>().unwrap().as_str(), t);
        }
        for t in ["quarterly", "annual", "loan", "investment", "risk"] {
            assert_eq!(t.parse::<ReportType>().unwrap().as_str(), t);
        }
        assert!("weekly".parse::<ReportType>().is_err());
        assert_eq!("Completed".parse::<ReportStatus>().unwrap(), ReportStatus::Completed);
    }

    #[test]
    fn test_report_json_uses_type_key() {
        let json = r#"{
            "id": 4,
            "title": "Investment Analysis - GreenTech Solutions",
            "type": "investment",
            "client": "GreenTech Solutions",
            "date": "2024-12-05",
            "size": "2.9 MB",
            "status": "pending"
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.report_type, ReportType::Investment);
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.date, NaiveDate::from_ymd_opt(2024, 12, 5).unwrap());
    }
}
