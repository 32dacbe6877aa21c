//! 戒期表预编译
//! 引擎构建时将固定戒期表整体解析为结构化注释，查询期只做克隆

use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

use super::parser::RuleTextParser;
use crate::config::SeverityPolicy;
use crate::rule::model::{RuleAnnotation, SeverityStats};
use crate::rule::table::FixedRuleTable;

/// 预解析后的固定戒期表
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleTable {
    annotations: HashMap<(u8, u8), Vec<RuleAnnotation>>,
    stats: SeverityStats,
}

impl CompiledRuleTable {
    /// 某农历月/日的已解析注释（保持原始顺序）
    pub fn lookup(&self, lunar_month: u8, lunar_day: u8) -> &[RuleAnnotation] {
        self.annotations
            .get(&(lunar_month, lunar_day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 全表等级统计
    pub fn stats(&self) -> SeverityStats {
        self.stats
    }
}

/// 戒期表编译器
pub struct RuleTableCompiler;

impl RuleTableCompiler {
    /// 按指定等级策略解析整张戒期表
    pub fn compile(table: &FixedRuleTable, policy: SeverityPolicy) -> CompiledRuleTable {
        let start = Instant::now();
        let mut annotations: HashMap<(u8, u8), Vec<RuleAnnotation>> = HashMap::new();
        let mut stats = SeverityStats::default();

        for month in 1..=12u8 {
            for day in 1..=30u8 {
                let raw_texts = table.lookup(month, day);
                if raw_texts.is_empty() {
                    continue;
                }
                let parsed: Vec<RuleAnnotation> = raw_texts
                    .iter()
                    .map(|raw| RuleTextParser::parse(raw, policy))
                    .collect();
                parsed.iter().for_each(|a| stats.record(a.severity));
                annotations.insert((month, day), parsed);
            }
        }

        debug!("✅ 戒期表编译完成，总耗时{:?}", start.elapsed());
        debug!(
            "📊 编译统计：大戒{}条、中戒{}条、宜戒{}条，共{}条",
            stats.major, stats.moderate, stats.minor, stats.total
        );

        CompiledRuleTable { annotations, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::model::SeverityLevel;

    #[test]
    fn test_every_embedded_entry_yields_reason_and_punishment() {
        let table = FixedRuleTable::embedded().unwrap();
        for policy in [SeverityPolicy::ExplicitOverride, SeverityPolicy::AlwaysDerive] {
            let compiled = RuleTableCompiler::compile(table, policy);
            let mut count = 0;
            for month in 1..=12u8 {
                for day in 1..=30u8 {
                    for annotation in compiled.lookup(month, day) {
                        assert!(!annotation.reason.is_empty(), "{}月{}日原因为空", month, day);
                        assert!(!annotation.punishment.is_empty(), "{}月{}日惩罚为空", month, day);
                        assert_ne!(annotation.severity, SeverityLevel::Safe);
                        count += 1;
                    }
                }
            }
            assert_eq!(count, table.iter().count());
            assert_eq!(compiled.stats().total as usize, count);
        }
    }

    #[test]
    fn test_first_day_major_under_both_policies() {
        let table = FixedRuleTable::embedded().unwrap();
        for policy in [SeverityPolicy::ExplicitOverride, SeverityPolicy::AlwaysDerive] {
            let compiled = RuleTableCompiler::compile(table, policy);
            for month in 1..=12u8 {
                assert!(
                    compiled
                        .lookup(month, 1)
                        .iter()
                        .any(|a| a.severity == SeverityLevel::Major),
                    "{}月初一无大戒",
                    month
                );
            }
        }
    }

    #[test]
    fn test_order_preserved() {
        let table = FixedRuleTable::from_json_str(
            r#"[{"month":3,"day":3,"entries":[{"text":"斗降，犯者夺纪"},{"text":"玄天上帝诞，犯者夺纪"}]}]"#,
        )
        .unwrap();
        let compiled = RuleTableCompiler::compile(&table, SeverityPolicy::ExplicitOverride);
        let reasons: Vec<&str> = compiled.lookup(3, 3).iter().map(|a| a.reason.as_str()).collect();
        assert_eq!(reasons, vec!["斗降", "玄天上帝诞"]);
    }
}
