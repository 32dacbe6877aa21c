//! 分类与标签提取
//! 分类取第一个命中的关键词组；标签取所有命中组的并集

use std::collections::BTreeSet;

use crate::provider::term::SolarTerm;
use crate::rule::model::PreceptCategory;

/// 分类规则（按优先级排列）
const CATEGORY_RULES: &[(&[&str], PreceptCategory)] = &[
    // 神明监察
    (&["四天王"], PreceptCategory::DeityInspection),
    (&["斗降", "北斗"], PreceptCategory::DeityInspection),
    (&["仓开"], PreceptCategory::DeityInspection),
    (&["人神"], PreceptCategory::DeityInspection),
    (&["司命"], PreceptCategory::DeityInspection),
    // 节日
    (&["雷斋"], PreceptCategory::Festival),
    (&["三元", "三官"], PreceptCategory::Festival),
    (&["腊"], PreceptCategory::Festival),
    // 天象
    (&["月望", "月朔", "月晦"], PreceptCategory::Astronomical),
    (&["天地交泰"], PreceptCategory::Astronomical),
    // 因果
    (&["杨公忌"], PreceptCategory::Karma),
    (&["九毒"], PreceptCategory::Karma),
    (&["五虚"], PreceptCategory::Karma),
    (&["六耗"], PreceptCategory::Karma),
    (&["阴毒"], PreceptCategory::Karma),
];

/// 标签规则
const TAG_RULES: &[(&[&str], &[&str])] = &[
    (&["四天王"], &["斋日", "四天王"]),
    (&["玉帝", "玉皇"], &["玉帝"]),
    (&["斗", "北斗"], &["斗星"]),
    (&["雷"], &["雷祖"]),
    (&["巡行"], &["巡行"]),
    (&["诞"], &["诞辰"]),
    (&["降"], &["降世"]),
    (&["奏事"], &["奏事"]),
    (&["月望"], &["月望"]),
    (&["月朔"], &["月朔"]),
    (&["月晦"], &["月晦"]),
    (&["杨公忌"], &["杨公忌"]),
    (&["九毒"], &["九毒日"]),
    (&["仓开日"], &["天地仓开日"]),
    (&["雷斋"], &["雷斋日"]),
];

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// 按原因文本归类
pub fn categorize_by_reason(reason: &str) -> PreceptCategory {
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| matches_any(reason, keywords))
        .map(|(_, category)| *category)
        .unwrap_or(PreceptCategory::Custom)
}

/// 提取标签
pub fn extract_tags(text: &str) -> BTreeSet<String> {
    let mut tags: BTreeSet<String> = TAG_RULES
        .iter()
        .filter(|(keywords, _)| matches_any(text, keywords))
        .flat_map(|(_, tags)| tags.iter().map(|t| t.to_string()))
        .collect();

    // 三辛日需要组合条件
    if text.contains("三辛") || (text.contains('辛') && text.contains('日')) {
        tags.insert("三辛日".to_string());
    }

    tags
}

/// 八节所属分组后缀
pub fn solar_term_group(term: SolarTerm) -> Option<&'static str> {
    match term {
        SolarTerm::ChunFen | SolarTerm::QiuFen => Some("二分日"),
        SolarTerm::XiaZhi | SolarTerm::DongZhi => Some("二至日"),
        SolarTerm::LiChun | SolarTerm::LiXia | SolarTerm::LiQiu | SolarTerm::LiDong => Some("四立日"),
        _ => None,
    }
}

/// 节气标签：节气名 + 分组后缀
pub fn solar_term_tags(term: SolarTerm) -> BTreeSet<String> {
    std::iter::once(term.name())
        .chain(solar_term_group(term))
        .map(str::to_string)
        .collect()
}
