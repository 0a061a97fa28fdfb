#![warn(clippy::uninlined_format_args)]

pub mod chart_presenter;
pub mod error_presenter;
pub mod report_presenter;
pub mod svg_table;

pub use chart_presenter::ChartPresenter;
pub use error_presenter::{format_ledger_error, format_parse_error};
pub use report_presenter::ReportPresenter;
