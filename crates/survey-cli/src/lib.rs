//! Library components of the survey coding CLI.

#![allow(missing_docs)]

pub mod batch;
pub mod logging;
pub mod summary;
