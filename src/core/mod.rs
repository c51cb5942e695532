pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{ReportFile, SuiteResults};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
