//! 月相戒期计算器
//! 弦日只看农历日；毁败日与月晦日依赖当月实际天数

use super::{CalculationContext, RuleCalculator, special_annotation};
use crate::error::PreceptResult;
use crate::provider::LunarDate;
use crate::rule::model::{PreceptCategory, RuleAnnotation, SeverityLevel};

const FIRST_QUARTER_DAYS: [u8; 2] = [7, 8];
const LAST_QUARTER_DAYS: [u8; 2] = [22, 23];

/// 月相戒期计算器
pub struct LunarPhaseCalculator;

impl RuleCalculator for LunarPhaseCalculator {
    const TYPE_NAME: &'static str = "月相";

    fn calculate(ctx: &CalculationContext<'_>) -> PreceptResult<Vec<RuleAnnotation>> {
        let lunar = &ctx.calendar.lunar;
        let month_length = ctx
            .provider
            .month_length(lunar.year, lunar.month, lunar.is_leap)?;

        let mut annotations = Vec::new();
        annotations.extend(Self::quarter_day(lunar));
        annotations.extend(Self::decline_day(lunar, month_length));
        annotations.extend(Self::month_end(lunar, month_length));
        Ok(annotations)
    }
}

impl LunarPhaseCalculator {
    /// 弦日：上弦初七、初八，下弦廿二、廿三
    fn quarter_day(lunar: &LunarDate) -> Option<RuleAnnotation> {
        let phase = if FIRST_QUARTER_DAYS.contains(&lunar.day) {
            "上弦"
        } else if LAST_QUARTER_DAYS.contains(&lunar.day) {
            "下弦"
        } else {
            return None;
        };

        Some(
            special_annotation("弦日", "犯之减寿一年", SeverityLevel::Moderate, PreceptCategory::Astronomical)
                .with_explanation(format!(
                    "此日为农历{}月{}，是{}日（上弦为初七、初八，下弦为廿二、廿三）。弦日是月亮盈亏变化的重要节点，阴阳不调、气机不平，宜静养少欲以养精气神，犯戒会损害寿命",
                    lunar.month_name(),
                    lunar.day_name(),
                    phase
                ))
                .with_suggestion("弦日应严格持戒，可诵经礼佛，静心养性，顺应天体运行变化")
                .with_tags(["弦日", phase]),
        )
    }

    /// 毁败日：大月十八，小月十七
    fn decline_day(lunar: &LunarDate, month_length: u8) -> Option<RuleAnnotation> {
        let (month_type, day_label) = match (month_length, lunar.day) {
            (30, 18) => ("大月", "十八日"),
            (29, 17) => ("小月", "十七日"),
            _ => return None,
        };

        Some(
            special_annotation("毁败日", "犯之得病", SeverityLevel::Minor, PreceptCategory::Astronomical)
                .with_explanation(format!(
                    "此日为农历{}月{}的毁败日（{}）。毁败日是天地气机不顺的日子，犯戒容易导致疾病",
                    lunar.month_name(),
                    month_type,
                    day_label
                ))
                .with_suggestion("毁败日应注意身体健康，持戒清净，可诵经祈福，避免不当行为")
                .with_tags(["毁败日", month_type]),
        )
    }

    /// 月晦日：当月最后一天
    fn month_end(lunar: &LunarDate, month_length: u8) -> Option<RuleAnnotation> {
        if lunar.day != month_length {
            return None;
        }
        let month_type = if month_length == 30 { "大月" } else { "小月" };

        Some(
            special_annotation("月晦日", "犯者减寿", SeverityLevel::Moderate, PreceptCategory::Astronomical)
                .with_explanation(format!(
                    "此日为农历{}月{}，是本月最后一天（{}月晦）。月晦是天地阴阳转换的关键时刻，司命之神在此日向天庭奏报世人善恶",
                    lunar.month_name(),
                    lunar.day_name(),
                    month_type
                ))
                .with_suggestion("月晦日应严格持戒，反省己过，可诵经忏悔，修身养性")
                .with_tags([month_type, "司命奏事"]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::config::EngineConfig;
    use crate::provider::fake::{FakeProvider, ymd};
    use crate::provider::{CalendarDate, LunarDateProvider};

    fn run(date: NaiveDate) -> Vec<RuleAnnotation> {
        let fake = FakeProvider::new();
        let config = EngineConfig::default();
        let lunar = fake.to_lunar(date).unwrap();
        let calendar = CalendarDate::resolve(&fake, date, lunar).unwrap();
        LunarPhaseCalculator::calculate(&CalculationContext::new(&calendar, &fake, &config)).unwrap()
    }

    fn reasons(date: NaiveDate) -> Vec<String> {
        run(date).into_iter().map(|a| a.reason).collect()
    }

    #[test]
    fn test_small_month_decline_and_end_are_independent() {
        // 正月为小月（29天）
        assert_eq!(reasons(ymd(2024, 2, 26)), vec!["毁败日"]);
        assert_eq!(reasons(ymd(2024, 3, 9)), vec!["月晦日"]);
        // 小月十八不是毁败日
        assert!(reasons(ymd(2024, 2, 27)).is_empty());
    }

    #[test]
    fn test_large_month_decline_and_end() {
        // 二月为大月（30天），自 2024-03-10 起
        let decline = run(ymd(2024, 3, 27));
        assert_eq!(decline.len(), 1);
        assert_eq!(decline[0].reason, "毁败日");
        assert!(decline[0].tags.contains("大月"));

        let month_end = run(ymd(2024, 4, 8));
        assert_eq!(month_end[0].reason, "月晦日");
        assert_eq!(month_end[0].severity, SeverityLevel::Moderate);
        // 大月廿九不是月晦
        assert!(reasons(ymd(2024, 4, 7)).is_empty());
    }

    #[test]
    fn test_quarter_days() {
        let first = run(ymd(2024, 2, 16));
        assert_eq!(first[0].reason, "弦日");
        assert!(first[0].tags.contains("上弦"));
        assert!(reasons(ymd(2024, 2, 17)).contains(&"弦日".to_string()));

        let last = run(ymd(2024, 3, 3));
        assert!(last[0].tags.contains("下弦"));
        assert!(reasons(ymd(2024, 2, 18)).is_empty());
    }
}
