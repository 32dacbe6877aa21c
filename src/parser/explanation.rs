//! 说明与修行建议文本

use crate::rule::model::SeverityLevel;

/// 默认说明
pub const DEFAULT_EXPLANATION: &str = "传统戒期，应持戒清净，避免不当行为";

/// 说明映射（按顺序取第一个被原因包含的关键词）
const EXPLANATION_MAP: &[(&str, &str)] = &[
    (
        "释迦如来成道日",
        "农历腊月初八是释迦牟尼佛在菩提树下夜睹明星、悟道成佛的殊胜日子。此日是佛教最重要的纪念日之一，佛陀在此日证得无上正等正觉，开启了佛法在人间的传播。此日功德殊胜，持戒修行可获无量福报",
    ),
    (
        "四天王巡行",
        "四天王巡行日是每月初八、十四、十五、廿三、廿九、三十日。四天王（东方持国天王、南方增长天王、西方广目天王、北方多闻天王）于此六日巡视人间，考察善恶，记录功过。此日宜持戒清净、行善积德",
    ),
    ("斗降", "斗星君下降之日，监察世人行为"),
    (
        "雷斋日",
        "雷斋日是每月初六日，为道教斋戒祭祀雷祖（九天应元雷声普化天尊）之日。雷祖巡视考察人类善恶，主持正义、惩恶扬善。此日宜斋戒清净、行善积福，犯戒者减寿",
    ),
    ("月望", "月圆之日，阴阳交泰，宜清净持戒"),
    ("月朔", "新月之日，月神诞辰，宜持戒祈福"),
    ("三元降", "三元（天、地、水）之神下降，校世人善恶"),
    (
        "天地仓开日",
        "天地仓开日是天仓、地仓开启之日，此日天地之气交流，仓廪开放，是吉庆之日，犯戒会损伤寿命",
    ),
    (
        "天仓开日",
        "天仓开日是天仓开启之日，此日天地之气交流，仓廪开放，是吉庆之日，犯戒会损伤寿命",
    ),
    ("人神在阴", "先祖神灵在阴间之日，犯戒易得疾病，宜先一日即戒"),
    ("司命奏事", "司命之神向天庭奏报世人善恶"),
    ("杨公忌", "唐代风水宗师杨筠松所订定的忌日，诸事不宜"),
    (
        "五虚忌",
        "五虚指脉细、皮寒、气少、泄利前后、饮食不入等五种虚弱状态，此日犯戒易损伤身体",
    ),
    ("六耗忌", "六耗指阴、阳、晦、明、风、雨所导致的六种疾病，此日犯戒易致病"),
    ("九毒日", "九毒日天地之气不正，湿热毒气盛行，犯戒易遭奇祸不测"),
    ("天地交泰", "天地阴阳交合之日，犯戒可能导致严重后果"),
    ("阴毒日", "阴毒大忌之日，邪气最盛，犯戒有大凶险"),
    (
        "三辛日",
        "三辛日是每月天干为辛的日子。传统认为辛日为雷祖（九天应元雷声普化天尊）监观万天、亲察人间之日，此日雷祖巡视世间善恶，犯戒会损害寿命",
    ),
];

/// 月晦日说明
pub const MONTH_END_EXPLANATION: &str = "月晦是农历每月的最后一日，天地交泰、阴阳转换的关键时刻。司命之神在此日向天庭奏报世人善恶。如遇到小月（只有29天），则廿九日即为月晦日。";
pub const MONTH_END_SUGGESTION: &str = "月晦日应严格持戒，反省己过，可诵经忏悔，修身养性";
pub const MONTH_END_NOTE: &str = "如月小即戒廿九日";

/// 成道日建议
pub const ENLIGHTENMENT_SUGGESTION: &str = "成道日应严格持戒，可礼佛诵经、持诵《金刚经》《心经》等经典，食用腊八粥以纪念佛陀成道，广修善业，发菩提心";

/// 凶险事件建议
pub const SPECIAL_EVENT_SUGGESTION: &str = "此日有大凶险，应严格持戒，避免一切不当行为";

/// 按原因取说明
pub fn explanation_for(reason: &str) -> &'static str {
    EXPLANATION_MAP
        .iter()
        .find(|(key, _)| reason.contains(key))
        .map(|(_, text)| *text)
        .unwrap_or(DEFAULT_EXPLANATION)
}

/// 凶险事件说明
pub fn special_event_explanation(reason: &str) -> &'static str {
    if reason.contains("天地交泰") {
        "天地阴阳交泰之日，犯戒可能导致严重后果"
    } else if reason.contains("九毒") {
        "九毒日天地之气不正，犯戒易遭奇祸不测"
    } else {
        "此日特殊，应严格持戒，避免一切不当行为"
    }
}

fn base_suggestion(level: SeverityLevel) -> &'static str {
    match level {
        SeverityLevel::Major => "大戒之日，应严格持戒，可诵经礼忏，广修善业，以求消灾祈福",
        SeverityLevel::Moderate => "中戒之日，应谨慎持戒，避免不当行为，可修善积德",
        SeverityLevel::Minor => "宜戒之日，应基本持戒，保持身心清净",
        SeverityLevel::Safe => "平安之日，可正常修行，保持正念",
    }
}

/// 修行建议：等级基础建议 + 关键词追加建议
pub fn suggestion_for(reason: &str, level: SeverityLevel) -> String {
    if reason.contains("释迦如来成道日") {
        return ENLIGHTENMENT_SUGGESTION.to_string();
    }

    let mut suggestion = base_suggestion(level).to_string();
    if reason.contains("四天王") {
        suggestion.push_str("，可念诵四天王名号或持诵相关经咒");
    }
    if reason.contains('佛') || reason.contains("菩萨") {
        suggestion.push_str("，可持诵佛号或菩萨圣号，修行布施等善业");
    }
    if reason.contains("雷斋") {
        suggestion.push_str("，宜食素斋，避免杀生，可诵雷尊经咒");
    }
    suggestion
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explanation_first_match_and_default() {
        assert!(explanation_for("四天王巡行").starts_with("四天王巡行日"));
        // "天地仓开日"先于"天仓开日"
        assert!(explanation_for("天地仓开日").starts_with("天地仓开日"));
        assert_eq!(explanation_for("长春真人诞"), DEFAULT_EXPLANATION);
    }

    #[test]
    fn test_suggestion_additions_stack() {
        let s = suggestion_for("四天王巡行", SeverityLevel::Minor);
        assert_eq!(s, "宜戒之日，应基本持戒，保持身心清净，可念诵四天王名号或持诵相关经咒");

        let s = suggestion_for("药师琉璃光佛诞", SeverityLevel::Major);
        assert!(s.starts_with("大戒之日"));
        assert!(s.ends_with("修行布施等善业"));

        assert_eq!(suggestion_for("释迦如来成道日", SeverityLevel::Minor), ENLIGHTENMENT_SUGGESTION);
    }
}
