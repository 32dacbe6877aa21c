//! 固定戒期表
//! 农历月/日 -> 原始戒期文本的只读查表，以及十斋日判断

use std::collections::HashMap;
use once_cell::sync::OnceCell;
use tracing::debug;

use super::model::{FixedRuleEntry, RawRuleText};
use crate::error::{PreceptError, PreceptResult};

/// 内置戒期表（编译期嵌入）
const EMBEDDED_RULES_JSON: &str = include_str!("../../data/fixed_rules.json");

/// 十斋日：每月固定的十个农历日
pub const TEN_DAY_FAST_DAYS: [u8; 10] = [1, 8, 14, 15, 18, 23, 24, 28, 29, 30];

static EMBEDDED_TABLE: OnceCell<FixedRuleTable> = OnceCell::new();

/// 固定戒期表（运行期不可变）
#[derive(Debug, Clone, Default)]
pub struct FixedRuleTable {
    entries: HashMap<(u8, u8), Vec<RawRuleText>>,
}

impl FixedRuleTable {
    /// 内置戒期表，进程内只解析一次
    pub fn embedded() -> PreceptResult<&'static FixedRuleTable> {
        EMBEDDED_TABLE.get_or_try_init(|| Self::from_json_str(EMBEDDED_RULES_JSON))
    }

    /// 从JSON文本构建戒期表（自定义戒期表入口）
    pub fn from_json_str(json: &str) -> PreceptResult<Self> {
        let raw_entries: Vec<FixedRuleEntry> = serde_json::from_str(json)?;
        Self::from_entries(raw_entries)
    }

    /// 从条目列表构建，校验月/日范围；同一日重复出现时按出现顺序追加
    pub fn from_entries(raw_entries: Vec<FixedRuleEntry>) -> PreceptResult<Self> {
        let mut entries: HashMap<(u8, u8), Vec<RawRuleText>> = HashMap::new();
        let mut text_count = 0usize;

        for entry in raw_entries {
            if !(1..=12).contains(&entry.month) || !(1..=30).contains(&entry.day) {
                return Err(PreceptError::RuleTableError(format!(
                    "农历日期非法：{}月{}日",
                    entry.month, entry.day
                )));
            }
            if entry.entries.iter().any(|raw| raw.text.trim().is_empty()) {
                return Err(PreceptError::RuleTableError(format!(
                    "{}月{}日存在空白戒期文本",
                    entry.month, entry.day
                )));
            }
            text_count += entry.entries.len();
            entries
                .entry((entry.month, entry.day))
                .or_default()
                .extend(entry.entries);
        }

        debug!("戒期表加载完成，覆盖{}个农历日，共{}条原始文本", entries.len(), text_count);
        Ok(Self { entries })
    }

    /// 查询某农历月/日的原始戒期文本（无条目时返回空切片）
    pub fn lookup(&self, lunar_month: u8, lunar_day: u8) -> &[RawRuleText] {
        self.entries
            .get(&(lunar_month, lunar_day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 是否为十斋日
    pub fn is_ten_day_fast(lunar_day: u8) -> bool {
        TEN_DAY_FAST_DAYS.contains(&lunar_day)
    }

    /// 遍历全部（月, 日, 原始文本）
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8, &RawRuleText)> {
        self.entries
            .iter()
            .flat_map(|(&(month, day), texts)| texts.iter().map(move |text| (month, day, text)))
    }

    pub fn day_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::model::SeverityLevel;

    #[test]
    fn test_embedded_table_loads_once() {
        let first = FixedRuleTable::embedded().unwrap();
        let second = FixedRuleTable::embedded().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.day_count() > 200);
    }

    #[test]
    fn test_every_first_day_has_major_entry() {
        let table = FixedRuleTable::embedded().unwrap();
        for month in 1..=12u8 {
            let texts = table.lookup(month, 1);
            assert!(!texts.is_empty(), "{}月初一缺少条目", month);
            assert!(texts.iter().any(|t| t.severity == Some(SeverityLevel::Major)));
        }
    }

    #[test]
    fn test_lookup_missing_day_is_empty() {
        let table = FixedRuleTable::from_json_str(
            r#"[{"month":1,"day":15,"entries":[{"text":"月望，犯者夺纪","severity":"major"}]}]"#,
        )
        .unwrap();
        assert_eq!(table.lookup(1, 15).len(), 1);
        assert!(table.lookup(1, 2).is_empty());
        assert!(table.lookup(13, 1).is_empty());
    }

    #[test]
    fn test_invalid_month_rejected() {
        let err = FixedRuleTable::from_json_str(r#"[{"month":13,"day":1,"entries":[]}]"#).unwrap_err();
        assert!(matches!(err, PreceptError::RuleTableError(_)));
    }

    #[test]
    fn test_blank_text_rejected() {
        let err = FixedRuleTable::from_json_str(r#"[{"month":2,"day":3,"entries":[{"text":"  "}]}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("2月3日"));
    }

    #[test]
    fn test_ten_day_fast_set() {
        let fast: Vec<u8> = (1..=30).filter(|d| FixedRuleTable::is_ten_day_fast(*d)).collect();
        assert_eq!(fast, vec![1, 8, 14, 15, 18, 23, 24, 28, 29, 30]);
    }
}
