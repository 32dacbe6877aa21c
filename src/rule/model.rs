//! 戒期数据模型定义
//! 仅存储规则与注释数据，无任何业务逻辑，支持序列化/反序列化

use std::collections::BTreeSet;
use std::fmt;
use serde::{Deserialize, Serialize};

/// 戒期等级（全序：Major > Moderate > Minor > Safe）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Safe,
    Minor,
    Moderate,
    Major,
}

impl SeverityLevel {
    /// 中文等级名称
    pub fn label(&self) -> &'static str {
        match self {
            SeverityLevel::Major => "大戒",
            SeverityLevel::Moderate => "中戒",
            SeverityLevel::Minor => "宜戒",
            SeverityLevel::Safe => "安全",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 戒期分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreceptCategory {
    DeityInspection,
    Festival,
    SolarTerm,
    Anniversary,
    Astronomical,
    Karma,
    Custom,
}

impl PreceptCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PreceptCategory::DeityInspection => "神明监察",
            PreceptCategory::Festival => "节日斋日",
            PreceptCategory::SolarTerm => "节气戒期",
            PreceptCategory::Anniversary => "诞辰纪念",
            PreceptCategory::Astronomical => "天象戒期",
            PreceptCategory::Karma => "因果戒期",
            PreceptCategory::Custom => "自定义戒期",
        }
    }
}

impl fmt::Display for PreceptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 注释来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreceptKind {
    /// 固定戒期表
    Regular,
    /// 动态计算（节气、干支、月相、节日）
    Special,
    /// 十斋日
    FastingDay,
}

/// 单条戒期注释
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAnnotation {
    pub reason: String,
    pub punishment: String,
    pub severity: SeverityLevel,
    pub category: PreceptCategory,
    pub kind: PreceptKind,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub explanation: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RuleAnnotation {
    /// 以核心字段创建注释，其余字段取空值
    pub fn new(
        reason: impl Into<String>,
        punishment: impl Into<String>,
        severity: SeverityLevel,
        category: PreceptCategory,
        kind: PreceptKind,
    ) -> Self {
        Self {
            reason: reason.into(),
            punishment: punishment.into(),
            severity,
            category,
            kind,
            tags: BTreeSet::new(),
            explanation: String::new(),
            suggestion: String::new(),
            special_note: None,
            source: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    pub fn with_special_note(mut self, note: impl Into<String>) -> Self {
        self.special_note = Some(note.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 生成完整描述文本（标题 + 说明 + 建议 + 分类）
    pub fn description(&self) -> String {
        let mut description = format!("{} - {} - {}", self.reason, self.punishment, self.severity);
        if !self.explanation.is_empty() {
            description.push_str(&format!("\n说明：{}", self.explanation));
        }
        if !self.suggestion.is_empty() {
            description.push_str(&format!("\n建议：{}", self.suggestion));
        }
        description.push_str(&format!("\n分类：{}", self.category));
        description
    }
}

// ======== 为 RuleAnnotation 实现 Display trait（用于 CLI 月汇总文本输出） ========
impl fmt::Display for RuleAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}，{}", self.severity, self.reason, self.punishment)
    }
}

/// 固定戒期原始条目（原始文本 + 可选显式等级）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRuleText {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityLevel>,
}

impl RawRuleText {
    pub fn new(text: impl Into<String>, severity: Option<SeverityLevel>) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

/// 固定戒期表中的一日：农历月/日 -> 有序原始条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRuleEntry {
    pub month: u8,
    pub day: u8,
    pub entries: Vec<RawRuleText>,
}

/// 单日等级统计（月视图使用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityStats {
    pub major: u32,
    pub moderate: u32,
    pub minor: u32,
    pub safe: u32,
    pub total: u32,
}

impl SeverityStats {
    pub fn record(&mut self, level: SeverityLevel) {
        match level {
            SeverityLevel::Major => self.major += 1,
            SeverityLevel::Moderate => self.moderate += 1,
            SeverityLevel::Minor => self.minor += 1,
            SeverityLevel::Safe => self.safe += 1,
        }
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_total_order() {
        assert!(SeverityLevel::Major > SeverityLevel::Moderate);
        assert!(SeverityLevel::Moderate > SeverityLevel::Minor);
        assert!(SeverityLevel::Minor > SeverityLevel::Safe);

        let max = [SeverityLevel::Minor, SeverityLevel::Major, SeverityLevel::Moderate]
            .into_iter()
            .max();
        assert_eq!(max, Some(SeverityLevel::Major));
    }

    #[test]
    fn test_description_layout() {
        let annotation = RuleAnnotation::new(
            "甲子日",
            "犯之减寿一年",
            SeverityLevel::Moderate,
            PreceptCategory::Astronomical,
            PreceptKind::Special,
        )
        .with_explanation("六十甲子之首")
        .with_suggestion("宜持戒");

        assert_eq!(
            annotation.description(),
            "甲子日 - 犯之减寿一年 - 中戒\n说明：六十甲子之首\n建议：宜持戒\n分类：天象戒期"
        );
        assert_eq!(annotation.to_string(), "[中戒] 甲子日，犯之减寿一年");
    }

    #[test]
    fn test_raw_rule_text_json() {
        let raw: RawRuleText = serde_json::from_str(r#"{"text":"月朔，犯者夺纪","severity":"major"}"#).unwrap();
        assert_eq!(raw.severity, Some(SeverityLevel::Major));

        let bare: RawRuleText = serde_json::from_str(r#"{"text":"宜戒"}"#).unwrap();
        assert_eq!(bare.severity, None);
    }
}
