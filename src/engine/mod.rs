//! 引擎模块：按日汇总全部戒期注释
pub mod engine;

pub use self::engine::{DayAnnotations, MonthSummary, PreceptEngine, max_severity_of};
