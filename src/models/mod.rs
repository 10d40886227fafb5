pub mod params;
pub mod report;

pub use params::{ParamSettings, RawParams, ReportParams, DEFAULT_TAXONOMY};
pub use report::{
    AggregateRow, DimensionKey, RawRow, RenderedReport, Report, ReportBody, ReportKind,
    ZeroHitItem, ZeroHitOrder,
};
