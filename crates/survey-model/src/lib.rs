//! Data model for coding survey responses.
//!
//! Code schemes, coding configurations and coding plans are immutable once
//! built and can be shared read-only across threads.

pub mod code;
pub mod coding;
pub mod error;
pub mod label;
pub mod observation;
pub mod scheme;
pub mod strategy;

pub use code::{Code, CodeType, ControlCode};
pub use coding::{CodingConfiguration, CodingMode, CodingPlan, CodingPlanBuilder};
pub use error::{ErrorKind, ModelError, Result};
pub use label::{CodedValue, Label, Origin};
pub use observation::{Observation, sort_chronologically};
pub use scheme::CodeScheme;
pub use strategy::{Cleaner, ImputationRule, LabelFoldStrategy, LocationHierarchy, RawFoldStrategy};
