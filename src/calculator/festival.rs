//! 节日戒期计算器：三元日、二社日、三伏日

use chrono::{Datelike, NaiveDate};

use super::cycle_search::nth_matching_day_after;
use super::{CalculationContext, RuleCalculator, special_annotation};
use crate::error::PreceptResult;
use crate::provider::{HeavenlyStem, SolarTerm};
use crate::rule::model::{PreceptCategory, RuleAnnotation, SeverityLevel};

/// 三元：农历月 -> 元名
const THREE_ORIGINS: [(u8, &str); 3] = [(1, "上元"), (7, "中元"), (10, "下元")];
const THREE_ORIGINS_DAY: u8 = 15;
/// 社日取立春/立秋后第几个戊日
const EARTH_GOD_ORDINAL: u32 = 5;

/// 节日戒期计算器
pub struct FestivalCalculator;

impl RuleCalculator for FestivalCalculator {
    const TYPE_NAME: &'static str = "节日";

    fn calculate(ctx: &CalculationContext<'_>) -> PreceptResult<Vec<RuleAnnotation>> {
        let mut annotations = Vec::new();
        annotations.extend(Self::three_origins(ctx));
        annotations.extend(Self::earth_god_day(ctx)?);
        annotations.extend(Self::dog_day(ctx)?);
        Ok(annotations)
    }
}

impl FestivalCalculator {
    /// 三元日（正月、七月、十月十五）
    fn three_origins(ctx: &CalculationContext<'_>) -> Option<RuleAnnotation> {
        let lunar = &ctx.calendar.lunar;
        if lunar.day != THREE_ORIGINS_DAY {
            return None;
        }
        let (_, yuan) = THREE_ORIGINS.iter().find(|(month, _)| *month == lunar.month)?;

        Some(
            special_annotation(
                format!("三元日（{}）", yuan),
                "犯之减寿五年",
                SeverityLevel::Major,
                PreceptCategory::Festival,
            )
            .with_explanation(format!(
                "{}（农历{}月十五），三元日之一。三元日是天官、地官、水官巡行世间，校定善恶的重要日子，犯戒会严重损害寿命",
                yuan,
                lunar.month_name()
            ))
            .with_suggestion("三元日应严格持戒，可礼拜三官大帝，诵经礼忏，广修善业，以求消灾祈福")
            .with_tags(["三元日", *yuan, "三官大帝", "巡行"]),
        )
    }

    /// 三伏日，由数据源直接给出
    fn dog_day(ctx: &CalculationContext<'_>) -> PreceptResult<Option<RuleAnnotation>> {
        let Some(dog_day) = ctx.provider.dog_day(ctx.calendar.date)? else {
            return Ok(None);
        };
        let reason = dog_day.to_string();

        Ok(Some(
            special_annotation(
                reason.clone(),
                "犯之减寿一年",
                SeverityLevel::Moderate,
                PreceptCategory::Astronomical,
            )
            .with_explanation(format!(
                "{}。三伏日是夏季最炎热的时段，分为初伏、中伏、末伏三个阶段。此时天地阳气最盛，人体气血外浮，精气易泄，犯戒会损害寿命",
                reason
            ))
            .with_suggestion("三伏日应清心寡欲，避免过度劳累，可静心养神，饮食清淡，以养护精气")
            .with_tags(["三伏日", dog_day.period.name()]),
        ))
    }

    /// 二社日：立春/立秋后（不含当日）第五个戊日
    fn earth_god_day(ctx: &CalculationContext<'_>) -> PreceptResult<Option<RuleAnnotation>> {
        let date = ctx.calendar.date;
        if ctx.calendar.gan_zhi.stem != HeavenlyStem::Wu {
            return Ok(None);
        }

        let terms = ctx.provider.solar_terms_of_year(date.year())?;
        let window = ctx.config.cycle_scan_window_days;
        for (anchor_term, she_type) in [(SolarTerm::LiChun, "春社日"), (SolarTerm::LiQiu, "秋社日")] {
            let Some(anchor) = terms.iter().find(|t| t.term == anchor_term).map(|t| t.date) else {
                continue;
            };
            if !within_window(anchor, date, window) {
                continue;
            }
            let she_day = nth_matching_day_after(ctx.provider, anchor, EARTH_GOD_ORDINAL, window, |gz| {
                gz.stem == HeavenlyStem::Wu
            })?;
            if she_day == date {
                return Ok(Some(Self::earth_god_annotation(anchor_term, she_type)));
            }
        }
        Ok(None)
    }

    fn earth_god_annotation(anchor_term: SolarTerm, she_type: &str) -> RuleAnnotation {
        let meaning = if anchor_term == SolarTerm::LiChun {
            "是祭祀土地神、祈求一年风调雨顺、五谷丰登的重要日子"
        } else {
            "是答谢土地神滋养万物、庆贺丰收的吉祥日子"
        };

        special_annotation("二社日", "犯之减寿五年", SeverityLevel::Major, PreceptCategory::Festival)
            .with_explanation(format!(
                "{}是{}后的第五个戊日，{}，当清净身心，修善祈福，犯戒会严重损害寿命",
                she_type, anchor_term, meaning
            ))
            .with_suggestion("社日应严格持戒，可祭祀土地神，诵经礼佛，修身养性，避免一切不当行为")
            .with_tags(["二社日", she_type, "土地神"])
    }
}

fn within_window(anchor: NaiveDate, date: NaiveDate, window: u32) -> bool {
    let elapsed = (date - anchor).num_days();
    elapsed > 0 && elapsed <= i64::from(window)
}
