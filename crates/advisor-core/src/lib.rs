//! Advisor Core Library
//!
//! Shared functionality for the Advisor financial evaluation toolkit:
//! - Derived metrics engine (income, expenses, net worth, insurance coverage)
//! - Evaluation drafts with required-field checks on submit
//! - Client, evaluation and report models
//! - Report list search and generation requests
//! - Display configuration with embedded defaults

pub mod config;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod models;
pub mod reports;

pub use config::{Config, ConfigSource};
pub use error::{Error, Result};
pub use evaluation::{EvaluationDraft, FieldError};
pub use metrics::{
    apply_edit, coerce_number, compute_coverage_needed, compute_monthly_expenses,
    compute_monthly_income, compute_net_income, compute_net_worth, derive, recompute_all,
    recompute_group, DerivedMetrics, EvaluationRecord, FieldGroup, RawField,
};
pub use models::{
    Client, Evaluation, EvaluationType, Gender, MaritalStatus, Report, ReportStatus, ReportType,
};
pub use reports::{ReportFilter, ReportRequest, ReportTemplate};
