//! 戒期等级判定
//! 按惩罚文本做有序关键词匹配：大戒 → 中戒 → 宜戒，均未命中时默认宜戒

use crate::config::SeverityPolicy;
use crate::rule::model::SeverityLevel;

/// 大戒关键词（死亡、夺纪夺禄等）
pub const MAJOR_KEYWORDS: &[&str] = &[
    "死", "亡", "夺纪", "夺禄", "暴亡", "血死", "贫夭", "夭亡", "绝嗣", "水厄", "奇祸", "大凶", "男女俱亡",
];

/// 中戒关键词（疾病、减寿损寿等）
pub const MODERATE_KEYWORDS: &[&str] = &[
    "重疾", "大病", "损寿", "减寿", "生病", "得病", "遭回禄", "产恶胎", "失瘏夭胎", "得危疾", "恶疾", "带疾",
    "子带疾",
];

/// 宜戒关键词（一般禁忌、斋戒）
pub const MINOR_KEYWORDS: &[&str] = &["宜戒", "大忌", "忌", "斋", "得祸", "削禄", "宜斋戒"];

/// 有序等级规则表，先匹配者胜出
const SEVERITY_RULES: &[(SeverityLevel, &[&str])] = &[
    (SeverityLevel::Major, MAJOR_KEYWORDS),
    (SeverityLevel::Moderate, MODERATE_KEYWORDS),
    (SeverityLevel::Minor, MINOR_KEYWORDS),
];

/// 根据惩罚文本判定等级（纯函数，对任意输入均有定义）
pub fn classify_severity(punishment: &str) -> SeverityLevel {
    SEVERITY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| punishment.contains(k)))
        .map(|(level, _)| *level)
        .unwrap_or(SeverityLevel::Minor)
}

/// 按全局策略合并显式等级与推导等级
pub fn resolve_severity(
    explicit: Option<SeverityLevel>,
    punishment: &str,
    policy: SeverityPolicy,
) -> SeverityLevel {
    match (policy, explicit) {
        (SeverityPolicy::ExplicitOverride, Some(level)) => level,
        _ => classify_severity(punishment),
    }
}

/// 文本是否带有惩罚含义的大戒/中戒关键词
pub(crate) fn has_grave_keyword(text: &str) -> bool {
    MAJOR_KEYWORDS
        .iter()
        .chain(MODERATE_KEYWORDS)
        .any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_wins_over_moderate() {
        // 同时含"减寿"与"夺纪"时按大戒处理
        assert_eq!(classify_severity("犯者减寿夺纪"), SeverityLevel::Major);
        assert_eq!(classify_severity("犯者夺纪"), SeverityLevel::Major);
        assert_eq!(classify_severity("犯者一年内亡"), SeverityLevel::Major);
        assert_eq!(classify_severity("犯之减寿五年"), SeverityLevel::Moderate);
    }

    #[test]
    fn test_moderate_and_minor() {
        assert_eq!(classify_severity("犯者得病"), SeverityLevel::Moderate);
        assert_eq!(classify_severity("犯者损寿，子带疾"), SeverityLevel::Moderate);
        assert_eq!(classify_severity("犯者得祸"), SeverityLevel::Minor);
        assert_eq!(classify_severity("宜戒"), SeverityLevel::Minor);
    }

    #[test]
    fn test_total_on_arbitrary_input() {
        for text in ["", "   ", "abc", "宜严格持戒", "🙂", "犯"] {
            let first = classify_severity(text);
            assert_eq!(first, classify_severity(text));
            assert_ne!(first, SeverityLevel::Safe);
        }
        assert_eq!(classify_severity(""), SeverityLevel::Minor);
    }

    #[test]
    fn test_policy_resolution() {
        // 显式大戒，文本推导为宜戒
        let explicit = Some(SeverityLevel::Major);
        assert_eq!(
            resolve_severity(explicit, "犯者大忌", SeverityPolicy::ExplicitOverride),
            SeverityLevel::Major
        );
        assert_eq!(
            resolve_severity(explicit, "犯者大忌", SeverityPolicy::AlwaysDerive),
            SeverityLevel::Minor
        );
        assert_eq!(
            resolve_severity(None, "犯者夺纪", SeverityPolicy::ExplicitOverride),
            SeverityLevel::Major
        );
    }
}
