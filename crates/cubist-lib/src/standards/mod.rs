//! Standards compliance: integrity constraints, conformance rules, and
//! declared standard versions.

pub mod conformance;
pub mod integrity;
pub mod versions;


pub use conformance::{ConformanceRule, RuleCheck, RuleRegistry, RuleViolation, cube_structure};
pub use integrity::{IntegrityChecker, IntegrityConstraint, collect_code_lists};
pub use versions::{CompatibilityMatrix, StandardSpec, VersionCatalog, VersionManager};
