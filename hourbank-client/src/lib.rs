//! hourbank-client: authenticated report session, retrying month fetches, and period aggregation.

pub mod aggregate;
pub mod fetch;
pub mod session;

pub use aggregate::ProgressFn;
pub use session::{ReportSession, normalize_base_url};
