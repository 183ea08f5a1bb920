//! Cubist: semantic analysis and standards validation for cube-oriented
//! statistical analysis specifications.
//!
//! # Example
//!
//! ```
//! use cubist_lib::{ReportConfig, ValidationBuilder};
//!
//! let json = r#"{"declarations": [
//!     {"kind": "cube", "name": "ADSL", "structure": {
//!         "dimensions": [{"name": "USUBJID", "type": {"base": "identifier"}}],
//!         "measures": [{"name": "AGE", "type": {"base": "integer"}}]
//!     }}
//! ]}"#;
//!
//! let program = cubist_core::parse_program(json).expect("valid input");
//! let outcome = ValidationBuilder::new(&program).run();
//! let report = outcome.report(&ReportConfig::default());
//! eprintln!("{}", report.render_text());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod diagnostics;
pub mod report;
pub mod standards;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_utils;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use report::{ReportConfig, ReportFormat, ValidationReport};
pub use standards::{RuleRegistry, VersionCatalog, VersionManager};
pub use validate::{Stage, ValidationBuilder, ValidationOutcome, validate};

/// Errors that stop a run before any diagnostics can be produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input JSON (program or rule registry) could not be decoded.
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("rule {rule} has an invalid pattern: {message}")]
    InvalidRulePattern { rule: String, message: String },

    #[error("rule id {0} is declared more than once")]
    DuplicateRule(String),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Decode a program, wrapping decode failures in [`Error::Decode`].
pub fn load_program(json: &str) -> Result<cubist_core::Program> {
    cubist_core::parse_program(json).map_err(|source| Error::Decode {
        what: "program",
        source,
    })
}
