//! 规则模块
//! 负责戒期数据模型定义与固定戒期表

pub mod model;
pub mod table;

pub use self::model::{
    FixedRuleEntry, PreceptCategory, PreceptKind, RawRuleText, RuleAnnotation, SeverityLevel,
    SeverityStats,
};
pub use self::table::{FixedRuleTable, TEN_DAY_FAST_DAYS};
