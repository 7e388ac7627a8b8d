//! Cleaning, fold and imputation rules for coded survey responses.
//!
//! The rules here are pure: they never iterate over datasets themselves.
//! A driver loads plans once, then calls [`reconcile_subject`] (or the
//! individual folds and imputations) for each subject.

pub mod cleaning;
pub mod coding;
pub mod error;
pub mod fold;
pub mod imputation;
pub mod subject;

pub use cleaning::{CleanedValue, clean, clean_age_with_range_filter, clean_gender};
pub use coding::auto_code;
pub use error::{FoldError, SubjectError, TransformError};
pub use fold::{fold_labels, fold_raw};
pub use imputation::apply_imputation;
pub use subject::{FoldedSubject, SubjectObservations, SubjectOutcome, reconcile_subject};
