//! Loading of code schemes, pipeline configuration and coding plans.

pub mod config;
pub mod error;
pub mod hash;
pub mod hierarchy;
pub mod pipeline;
pub mod plans;
pub mod registry;
pub mod scheme_loader;

pub use config::{PipelineConfig, SchemeEntry};
pub use error::StandardsError;
pub use hash::sha256_hex;
pub use hierarchy::{load_location_hierarchy, parse_location_hierarchy};
pub use pipeline::PipelineConfiguration;
pub use plans::{demog_coding_plans, follow_up_coding_plans, rqa_coding_plans, scheme_keys};
pub use registry::{SchemeRegistry, SchemeSummary};
pub use scheme_loader::{LoadedScheme, SchemeDocument, load_scheme, parse_scheme};
