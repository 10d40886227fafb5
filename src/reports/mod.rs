//! Report generation: building, paginating and serving cached reports

pub mod builder;
pub mod dispatcher;
pub mod paginator;

use thiserror::Error;

use crate::models::ReportKind;
use crate::source::SourceError;

pub use dispatcher::{ReportService, ReportSettings};
pub use paginator::{Navigation, NextPagePolicy, PageWindow, PAGE_SIZE};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown report kind '{0}'")]
    UnknownKind(String),
    #[error("Koko Analytics is not installed")]
    MissingDependency,
    #[error(transparent)]
    DataSource(#[from] SourceError),
    #[error("duplicate {kind} dimension '{key}' in source rows")]
    DuplicateDimension { kind: ReportKind, key: String },
}
