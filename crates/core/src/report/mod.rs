mod aggregate;
mod types;

pub use aggregate::{aggregate, DEFAULT_MAX_FINDINGS};
pub use types::{AuditReport, FindingSummary, SeverityCounts};
