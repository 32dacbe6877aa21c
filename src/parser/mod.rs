//! 戒期文本解析模块
//! 原始文本 -> 结构化注释：等级判定、分类标签、说明建议，以及整表预编译

pub mod categorizer;
pub mod compiler;
pub mod explanation;
pub mod parser;
pub mod severity;

pub use self::categorizer::{categorize_by_reason, extract_tags, solar_term_group, solar_term_tags};
pub use self::compiler::{CompiledRuleTable, RuleTableCompiler};
pub use self::explanation::{explanation_for, suggestion_for};
pub use self::parser::{GENERIC_ADVISORY, RuleTextParser};
pub use self::severity::{classify_severity, resolve_severity};
