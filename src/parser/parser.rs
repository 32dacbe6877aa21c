//! 戒期文本解析器
//! 将一条原始戒期文本解析为结构化注释：特殊短语优先，其余按固定顺序逐级尝试，先命中者胜出

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::categorizer::{categorize_by_reason, extract_tags};
use super::explanation::{
    MONTH_END_EXPLANATION, MONTH_END_NOTE, MONTH_END_SUGGESTION, SPECIAL_EVENT_SUGGESTION,
    explanation_for, special_event_explanation, suggestion_for,
};
use super::severity::{has_grave_keyword, resolve_severity};
use crate::config::SeverityPolicy;
use crate::error::{PreceptError, PreceptResult};
use crate::rule::model::{PreceptCategory, PreceptKind, RawRuleText, RuleAnnotation, SeverityLevel};

/// 通用劝诫值
pub const GENERIC_ADVISORY: &str = "宜戒";
/// 惩罚标记
const CONSEQUENCE_MARKER: &str = "犯者";
/// 凶险事件关键词
const HEALTH_HARM_KEYWORDS: &[&str] = &["暴亡", "贫夭", "血死", "水厄", "绝嗣", "夭亡"];
/// 逗号拆分时判定右半句为惩罚的关键词（另含全部大戒/中戒关键词）
const CONSEQUENCE_KEYWORDS: &[&str] = &["犯者", "宜", "忌", "减寿", "损寿", "夺纪"];

// 削禄夺纪（无"犯者"前缀）
static RANK_FORFEIT_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)，削禄夺纪").unwrap());
// 减寿/损寿（无"犯者"前缀）
static LIFESPAN_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)，(.*(?:减寿|损寿).*)$").unwrap());

/// 拆分结果的形态，决定后续分类/说明的取法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextShape {
    General,
    MonthEnd,
    Enlightenment,
    SpecialEvent,
}

#[derive(Debug)]
struct SplitText {
    reason: String,
    punishment: String,
    shape: TextShape,
}

impl SplitText {
    fn general(reason: &str, punishment: impl Into<String>) -> Self {
        Self {
            reason: reason.trim().to_string(),
            punishment: punishment.into(),
            shape: TextShape::General,
        }
    }
}

/// 戒期文本解析器
pub struct RuleTextParser;

impl RuleTextParser {
    /// 解析一条原始文本；无法解析时回退为通用注释，从不失败
    pub fn parse(raw: &RawRuleText, policy: SeverityPolicy) -> RuleAnnotation {
        match Self::split(&raw.text) {
            Ok(split) => Self::build(split, raw.severity, policy),
            Err(e) => {
                debug!("戒期文本回退为通用注释：{}", e);
                Self::fallback(raw, policy)
            }
        }
    }

    /// 解析单条文本（无显式等级）
    pub fn parse_text(text: &str, policy: SeverityPolicy) -> RuleAnnotation {
        Self::parse(&RawRuleText::new(text, None), policy)
    }

    /// 拆分原因与惩罚
    fn split(text: &str) -> PreceptResult<SplitText> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PreceptError::UnparseableRuleText("空文本".to_string()));
        }

        let split = Self::split_special(text)
            .or_else(|| Self::split_consequence_marker(text))
            .or_else(|| Self::split_secondary(text))
            .or_else(|| Self::split_bare_advisory(text))
            .or_else(|| Self::split_comma(text))
            .unwrap_or_else(|| SplitText::general(text, GENERIC_ADVISORY));

        if split.reason.is_empty() || split.punishment.is_empty() {
            return Err(PreceptError::UnparseableRuleText(text.to_string()));
        }
        Ok(split)
    }

    /// 特殊短语：月晦、释迦如来成道日
    fn split_special(text: &str) -> Option<SplitText> {
        let marker_part = text
            .find(CONSEQUENCE_MARKER)
            .map(|i| text[i..].trim().to_string());

        if text.contains("月晦") {
            return Some(SplitText {
                reason: "月晦日".to_string(),
                punishment: marker_part.unwrap_or_else(|| "犯者减寿".to_string()),
                shape: TextShape::MonthEnd,
            });
        }

        if text.contains("释迦如来成道日") {
            let reason = match text.split_once("，") {
                Some((left, _)) if marker_part.is_some() => left.trim(),
                _ => text,
            };
            return Some(SplitText {
                reason: reason.to_string(),
                punishment: marker_part.unwrap_or_else(|| "宜严格持戒".to_string()),
                shape: TextShape::Enlightenment,
            });
        }

        None
    }

    /// 第1步：首个"，犯者"处拆分
    fn split_consequence_marker(text: &str) -> Option<SplitText> {
        let (reason, rest) = text.split_once("，犯者")?;
        Some(SplitText::general(
            reason,
            format!("{}{}", CONSEQUENCE_MARKER, rest.trim()),
        ))
    }

    /// 第2步：削禄夺纪 → 减寿/损寿 → 凶险事件
    fn split_secondary(text: &str) -> Option<SplitText> {
        if let Some(caps) = RANK_FORFEIT_SPLIT.captures(text) {
            return Some(SplitText::general(&caps[1], "犯者削禄夺纪"));
        }

        if let Some(caps) = LIFESPAN_SPLIT.captures(text) {
            return Some(SplitText::general(&caps[1], Self::normalize_punishment(&caps[2])));
        }

        if HEALTH_HARM_KEYWORDS.iter().any(|k| text.contains(k)) {
            let (reason, punishment) = text.split_once('，')?;
            return Some(SplitText {
                reason: reason.trim().to_string(),
                punishment: punishment.trim().to_string(),
                shape: TextShape::SpecialEvent,
            });
        }

        None
    }

    /// 第3步：单独的"宜戒"
    fn split_bare_advisory(text: &str) -> Option<SplitText> {
        (text == GENERIC_ADVISORY).then(|| SplitText::general("宜戒之日", GENERIC_ADVISORY))
    }

    /// 第4步：首个逗号处拆分，右半句仅在含惩罚关键词时保留
    fn split_comma(text: &str) -> Option<SplitText> {
        let (left, right) = text.split_once('，')?;
        let right = right.trim();

        let is_consequence =
            CONSEQUENCE_KEYWORDS.iter().any(|k| right.contains(k)) || has_grave_keyword(right);
        let punishment = if is_consequence && !right.is_empty() {
            Self::normalize_punishment(right)
        } else {
            GENERIC_ADVISORY.to_string()
        };
        Some(SplitText::general(left, punishment))
    }

    /// 惩罚文本规范化：已含"犯"或以"宜"开头时原样保留，否则补"犯者"前缀
    fn normalize_punishment(clause: &str) -> String {
        let clause = clause.trim();
        if clause.contains('犯') || clause.starts_with('宜') {
            clause.to_string()
        } else {
            format!("{}{}", CONSEQUENCE_MARKER, clause)
        }
    }

    fn build(split: SplitText, explicit: Option<SeverityLevel>, policy: SeverityPolicy) -> RuleAnnotation {
        let severity = resolve_severity(explicit, &split.punishment, policy);
        let SplitText {
            reason,
            punishment,
            shape,
        } = split;

        match shape {
            TextShape::General => {
                let category = categorize_by_reason(&reason);
                let tags = extract_tags(&reason);
                let explanation = explanation_for(&reason);
                let suggestion = suggestion_for(&reason, severity);
                RuleAnnotation::new(reason, punishment, severity, category, PreceptKind::Regular)
                    .with_tags(tags)
                    .with_explanation(explanation)
                    .with_suggestion(suggestion)
            }
            TextShape::MonthEnd => RuleAnnotation::new(
                reason,
                punishment,
                severity,
                PreceptCategory::Astronomical,
                PreceptKind::Regular,
            )
            .with_tags(["月晦", "司命奏事"])
            .with_explanation(MONTH_END_EXPLANATION)
            .with_suggestion(MONTH_END_SUGGESTION)
            .with_special_note(MONTH_END_NOTE),
            TextShape::Enlightenment => {
                let explanation = explanation_for(&reason);
                let suggestion = suggestion_for(&reason, severity);
                RuleAnnotation::new(
                    reason,
                    punishment,
                    severity,
                    PreceptCategory::Anniversary,
                    PreceptKind::Regular,
                )
                .with_tags(["释迦如来", "成道日", "佛教圣日", "腊八"])
                .with_explanation(explanation)
                .with_suggestion(suggestion)
            }
            TextShape::SpecialEvent => {
                let tags = extract_tags(&reason);
                let explanation = special_event_explanation(&reason);
                RuleAnnotation::new(reason, punishment, severity, PreceptCategory::Karma, PreceptKind::Regular)
                    .with_tags(tags)
                    .with_explanation(explanation)
                    .with_suggestion(SPECIAL_EVENT_SUGGESTION)
            }
        }
    }

    /// 回退注释：原因为原文，惩罚为通用劝诫，宜戒
    fn fallback(raw: &RawRuleText, policy: SeverityPolicy) -> RuleAnnotation {
        let severity = match policy {
            SeverityPolicy::ExplicitOverride => raw.severity.unwrap_or(SeverityLevel::Minor),
            SeverityPolicy::AlwaysDerive => SeverityLevel::Minor,
        };
        RuleAnnotation::new(
            raw.text.clone(),
            GENERIC_ADVISORY,
            severity,
            PreceptCategory::Custom,
            PreceptKind::Regular,
        )
        .with_explanation(explanation_for(&raw.text))
        .with_suggestion(suggestion_for(&raw.text, severity))
    }
}
