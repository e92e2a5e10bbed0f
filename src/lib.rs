//! Second-lowest-cost Silver plan (SLCSP) lookup for a list of ZIP codes

pub mod error;
pub mod models;
pub mod plan_index;
pub mod report;
pub mod resolver;
pub mod zip_index;

pub use error::SlcspError;
pub use models::{MetalLevel, PlanRecord, RateAreaKey, SlcspRequest, ZipRecord};
pub use plan_index::PlanIndex;
pub use report::{generate_report, ReportConfig};
pub use resolver::{RateResolver, Resolution, ResolutionSummary};
pub use zip_index::ZipIndex;
