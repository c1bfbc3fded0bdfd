//! Derived metrics engine for financial evaluations
//!
//! Turns the raw line items of an evaluation (free-text amounts typed into a
//! form) into the read-only totals shown beside them:
//! - Monthly income: sum of the five income fields
//! - Monthly expenses: sum of the seven expense fields
//! - Net income: monthly income minus monthly expenses
//! - Net worth: balance-sheet assets minus liabilities
//! - Coverage needed: annual income to replace times years of coverage
//!
//! ## Coercion
//!
//! Every raw value goes through [`coerce_number`], which never fails. Empty,
//! missing and non-numeric input all count as zero, so a half-filled form
//! still produces a coherent summary. Totals that overflow are zero as well,
//! so every derived value is finite.
//!
//! ## Recompute passes
//!
//! The functions here are pure. Callers own the record and decide when to
//! recompute: [`recompute_all`] for a full pass, [`recompute_group`] or
//! [`apply_edit`] after a single edit. Net income is always taken from the
//! totals computed earlier in the same pass.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Groups of raw fields that feed the same derived values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    /// Feeds monthly income (and net income)
    Income,
    /// Feeds monthly expenses (and net income)
    Expenses,
    /// Feeds net worth
    BalanceSheet,
    /// Feeds coverage needed
    Coverage,
}

impl FieldGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expenses => "expenses",
            Self::BalanceSheet => "balance_sheet",
            Self::Coverage => "coverage",
        }
    }

    /// Raw fields belonging to this group, in form order
    pub fn fields(&self) -> &'static [RawField] {
        match self {
            Self::Income => INCOME_FIELDS,
            Self::Expenses => EXPENSE_FIELDS,
            Self::BalanceSheet => BALANCE_SHEET_FIELDS,
            Self::Coverage => COVERAGE_FIELDS,
        }
    }

    pub fn all() -> &'static [FieldGroup] {
        &[
            Self::Income,
            Self::Expenses,
            Self::BalanceSheet,
            Self::Coverage,
        ]
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-editable line item on the evaluation form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawField {
    PersonalIncome,
    SpouseIncome,
    RealEstateIncome,
    BusinessIncome,
    OtherIncome,
    RentMortgage,
    Groceries,
    Transportation,
    Utilities,
    Insurance,
    Entertainment,
    OtherExpenses,
    BsAssets,
    BsLiabilities,
    CoverageIncome,
    CoverageYears,
}

const INCOME_FIELDS: &[RawField] = &[
    RawField::PersonalIncome,
    RawField::SpouseIncome,
    RawField::RealEstateIncome,
    RawField::BusinessIncome,
    RawField::OtherIncome,
];

const EXPENSE_FIELDS: &[RawField] = &[
    RawField::RentMortgage,
    RawField::Groceries,
    RawField::Transportation,
    RawField::Utilities,
    RawField::Insurance,
    RawField::Entertainment,
    RawField::OtherExpenses,
];

const BALANCE_SHEET_FIELDS: &[RawField] = &[RawField::BsAssets, RawField::BsLiabilities];

const COVERAGE_FIELDS: &[RawField] = &[RawField::CoverageIncome, RawField::CoverageYears];

/// Names of the derived fields, as they appear in documents
pub const DERIVED_FIELD_NAMES: &[&str] = &[
    "monthlyIncome",
    "monthlyExpenses",
    "netIncome",
    "netWorth",
    "coverageNeeded",
];

impl RawField {
    /// Document (camelCase) name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalIncome => "personalIncome",
            Self::SpouseIncome => "spouseIncome",
            Self::RealEstateIncome => "realEstateIncome",
            Self::BusinessIncome => "businessIncome",
            Self::OtherIncome => "otherIncome",
            Self::RentMortgage => "rentMortgage",
            Self::Groceries => "groceries",
            Self::Transportation => "transportation",
            Self::Utilities => "utilities",
            Self::Insurance => "insurance",
            Self::Entertainment => "entertainment",
            Self::OtherExpenses => "otherExpenses",
            Self::BsAssets => "bsAssets",
            Self::BsLiabilities => "bsLiabilities",
            Self::CoverageIncome => "coverageIncome",
            Self::CoverageYears => "coverageYears",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::PersonalIncome => "Personal Income",
            Self::SpouseIncome => "Spouse Income",
            Self::RealEstateIncome => "Real Estate Income",
            Self::BusinessIncome => "Business Income",
            Self::OtherIncome => "Other Income",
            Self::RentMortgage => "Rent / Mortgage",
            Self::Groceries => "Groceries",
            Self::Transportation => "Transportation",
            Self::Utilities => "Utilities",
            Self::Insurance => "Insurance",
            Self::Entertainment => "Entertainment",
            Self::OtherExpenses => "Other Expenses",
            Self::BsAssets => "Assets",
            Self::BsLiabilities => "Liabilities",
            Self::CoverageIncome => "Annual Income to Replace",
            Self::CoverageYears => "Years of Coverage",
        }
    }

    /// The group whose derived values depend on this field
    pub fn group(&self) -> FieldGroup {
        match self {
            Self::PersonalIncome
            | Self::SpouseIncome
            | Self::RealEstateIncome
            | Self::BusinessIncome
            | Self::OtherIncome => FieldGroup::Income,
            Self::RentMortgage
            | Self::Groceries
            | Self::Transportation
            | Self::Utilities
            | Self::Insurance
            | Self::Entertainment
            | Self::OtherExpenses => FieldGroup::Expenses,
            Self::BsAssets | Self::BsLiabilities => FieldGroup::BalanceSheet,
            Self::CoverageIncome | Self::CoverageYears => FieldGroup::Coverage,
        }
    }

    /// All raw fields in form order
    pub fn all() -> impl Iterator<Item = RawField> {
        FieldGroup::all()
            .iter()
            .flat_map(|group| group.fields().iter().copied())
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RawField {
    type Err = String;

    /// Accepts the camelCase document name or its snake_case spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        if let Some(field) = RawField::all().find(|f| f.as_str().to_lowercase() == key) {
            return Ok(field);
        }

        if let Some(derived) = DERIVED_FIELD_NAMES
            .iter()
            .find(|name| name.to_lowercase() == key)
        {
            return Err(format!("{} is derived and cannot be edited", derived));
        }

        Err(format!("Unknown field: {}", s))
    }
}

/// Raw inputs plus derived totals for one evaluation
///
/// Raw fields hold whatever the user typed; `None` and `Some("")` mean the
/// same thing. Derived fields are only written by the functions in this
/// module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    // Income
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub personal_income: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub spouse_income: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub real_estate_income: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub business_income: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub other_income: Option<String>,

    // Expenses
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub rent_mortgage: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub groceries: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub transportation: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub utilities: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub entertainment: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub other_expenses: Option<String>,

    // Balance sheet
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub bs_assets: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub bs_liabilities: Option<String>,

    // Life insurance calculator
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub coverage_income: Option<String>,
    #[serde(default, deserialize_with = "raw_amount", skip_serializing_if = "Option::is_none")]
    pub coverage_years: Option<String>,

    // Derived
    #[serde(default, deserialize_with = "derived_amount")]
    pub monthly_income: f64,
    #[serde(default, deserialize_with = "derived_amount")]
    pub monthly_expenses: f64,
    #[serde(default, deserialize_with = "derived_amount")]
    pub net_income: f64,
    #[serde(default, deserialize_with = "derived_amount")]
    pub net_worth: f64,
    #[serde(default, deserialize_with = "derived_amount")]
    pub coverage_needed: f64,
}

impl EvaluationRecord {
    /// Empty record with all derived values at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current raw value of a field (`None` when empty)
    pub fn get(&self, field: RawField) -> Option<&str> {
        let value = match field {
            RawField::PersonalIncome => &self.personal_income,
            RawField::SpouseIncome => &self.spouse_income,
            RawField::RealEstateIncome => &self.real_estate_income,
            RawField::BusinessIncome => &self.business_income,
            RawField::OtherIncome => &self.other_income,
            RawField::RentMortgage => &self.rent_mortgage,
            RawField::Groceries => &self.groceries,
            RawField::Transportation => &self.transportation,
            RawField::Utilities => &self.utilities,
            RawField::Insurance => &self.insurance,
            RawField::Entertainment => &self.entertainment,
            RawField::OtherExpenses => &self.other_expenses,
            RawField::BsAssets => &self.bs_assets,
            RawField::BsLiabilities => &self.bs_liabilities,
            RawField::CoverageIncome => &self.coverage_income,
            RawField::CoverageYears => &self.coverage_years,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Overwrite a raw value. Does not touch derived fields.
    pub fn set(&mut self, field: RawField, value: &str) {
        let slot = match field {
            RawField::PersonalIncome => &mut self.personal_income,
            RawField::SpouseIncome => &mut self.spouse_income,
            RawField::RealEstateIncome => &mut self.real_estate_income,
            RawField::BusinessIncome => &mut self.business_income,
            RawField::OtherIncome => &mut self.other_income,
            RawField::RentMortgage => &mut self.rent_mortgage,
            RawField::Groceries => &mut self.groceries,
            RawField::Transportation => &mut self.transportation,
            RawField::Utilities => &mut self.utilities,
            RawField::Insurance => &mut self.insurance,
            RawField::Entertainment => &mut self.entertainment,
            RawField::OtherExpenses => &mut self.other_expenses,
            RawField::BsAssets => &mut self.bs_assets,
            RawField::BsLiabilities => &mut self.bs_liabilities,
            RawField::CoverageIncome => &mut self.coverage_income,
            RawField::CoverageYears => &mut self.coverage_years,
        };
        *slot = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, field: RawField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    /// Derived values as currently stored on the record
    pub fn derived(&self) -> DerivedMetrics {
        DerivedMetrics {
            monthly_income: self.monthly_income,
            monthly_expenses: self.monthly_expenses,
            net_income: self.net_income,
            net_worth: self.net_worth,
            coverage_needed: self.coverage_needed,
        }
    }
}

/// Snapshot of the five derived values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub net_income: f64,
    pub net_worth: f64,
    pub coverage_needed: f64,
}

impl DerivedMetrics {
    /// (label, value) pairs in display order
    pub fn rows(&self) -> [(&'static str, f64); 5] {
        [
            ("Monthly Income", self.monthly_income),
            ("Monthly Expenses", self.monthly_expenses),
            ("Net Income", self.net_income),
            ("Net Worth", self.net_worth),
            ("Coverage Needed", self.coverage_needed),
        ]
    }
}

/// Convert a raw value to a number, treating anything unusable as zero
///
/// Leading whitespace is skipped and the longest leading decimal literal is
/// used, so `"12abc"` is 12 while `"abc"` is 0. Results that are not finite
/// (e.g. `"1e999"`) are also 0.
pub fn coerce_number(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    match decimal_literal().find(raw.trim_start()) {
        Some(literal) => literal.as_str().parse::<f64>().map_or(0.0, finite_or_zero),
        None => 0.0,
    }
}

/// `[+-]digits[.digits][e[+-]digits]` at the start of the input
fn decimal_literal() -> &'static Regex {
    static LITERAL: OnceLock<Regex> = OnceLock::new();
    LITERAL.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
    })
}

/// Values that overflow `f64` count as zero, same as non-finite input
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn sum_fields(record: &EvaluationRecord, fields: &[RawField]) -> f64 {
    finite_or_zero(
        fields
            .iter()
            .fold(0.0, |total, field| total + coerce_number(record.get(*field))),
    )
}

/// Sum of the five income fields
pub fn compute_monthly_income(record: &EvaluationRecord) -> f64 {
    sum_fields(record, INCOME_FIELDS)
}

/// Sum of the seven expense fields
pub fn compute_monthly_expenses(record: &EvaluationRecord) -> f64 {
    sum_fields(record, EXPENSE_FIELDS)
}

pub fn compute_net_income(monthly_income: f64, monthly_expenses: f64) -> f64 {
    finite_or_zero(monthly_income - monthly_expenses)
}

pub fn compute_net_worth(record: &EvaluationRecord) -> f64 {
    finite_or_zero(
        coerce_number(record.get(RawField::BsAssets))
            - coerce_number(record.get(RawField::BsLiabilities)),
    )
}

/// Replacement-income multiple; no discounting or inflation
pub fn compute_coverage_needed(record: &EvaluationRecord) -> f64 {
    finite_or_zero(
        coerce_number(record.get(RawField::CoverageIncome))
            * coerce_number(record.get(RawField::CoverageYears)),
    )
}

/// All derived values for a record's current raw fields
pub fn derive(record: &EvaluationRecord) -> DerivedMetrics {
    let monthly_income = compute_monthly_income(record);
    let monthly_expenses = compute_monthly_expenses(record);
    DerivedMetrics {
        monthly_income,
        monthly_expenses,
        net_income: compute_net_income(monthly_income, monthly_expenses),
        net_worth: compute_net_worth(record),
        coverage_needed: compute_coverage_needed(record),
    }
}

/// Full recompute pass. Returns a new record; the input is left untouched.
pub fn recompute_all(record: &EvaluationRecord) -> EvaluationRecord {
    let derived = derive(record);
    EvaluationRecord {
        monthly_income: derived.monthly_income,
        monthly_expenses: derived.monthly_expenses,
        net_income: derived.net_income,
        net_worth: derived.net_worth,
        coverage_needed: derived.coverage_needed,
        ..record.clone()
    }
}

/// Recompute only the derived values that depend on `group`
///
/// Income and expense passes also refresh net income from the record's
/// totals after the group total is updated.
pub fn recompute_group(record: &EvaluationRecord, group: FieldGroup) -> EvaluationRecord {
    let mut next = record.clone();
    match group {
        FieldGroup::Income => {
            next.monthly_income = compute_monthly_income(&next);
            next.net_income = compute_net_income(next.monthly_income, next.monthly_expenses);
        }
        FieldGroup::Expenses => {
            next.monthly_expenses = compute_monthly_expenses(&next);
            next.net_income = compute_net_income(next.monthly_income, next.monthly_expenses);
        }
        FieldGroup::BalanceSheet => {
            next.net_worth = compute_net_worth(&next);
        }
        FieldGroup::Coverage => {
            next.coverage_needed = compute_coverage_needed(&next);
        }
    }
    next
}

/// Set one raw field and recompute the group it feeds
pub fn apply_edit(record: &EvaluationRecord, field: RawField, value: &str) -> EvaluationRecord {
    let mut next = record.clone();
    next.set(field, value);
    recompute_group(&next, field.group())
}

/// Raw amounts arrive as strings from forms but as numbers from hand-written
/// documents.
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountValue {
    Text(String),
    Number(f64),
}

fn raw_amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<AmountValue>::deserialize(deserializer)? {
            Some(AmountValue::Text(text)) if text.is_empty() => None,
            Some(AmountValue::Text(text)) => Some(text),
            Some(AmountValue::Number(number)) => Some(number.to_string()),
            None => None,
        },
    )
}

fn derived_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<AmountValue>::deserialize(deserializer)? {
            Some(AmountValue::Number(number)) => number,
            Some(AmountValue::Text(text)) => coerce_number(Some(&text)),
            None => 0.0,
        },
    )
}
