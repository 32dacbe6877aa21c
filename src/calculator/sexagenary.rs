//! 干支戒期计算器
//! 甲子、庚申为整码匹配；丙丁、三辛只看天干；阴阳错日按农历月查表整码匹配

use once_cell::sync::Lazy;

use super::{CalculationContext, RuleCalculator, special_annotation};
use crate::error::PreceptResult;
use crate::provider::{GanZhi, HeavenlyStem};
use crate::rule::model::{PreceptCategory, RuleAnnotation, SeverityLevel};

/// 阳错日：农历正月至腊月各一
const YANG_GAP_CODES: [&str; 12] = [
    "甲寅", "乙卯", "甲辰", "丁巳", "丙午", "丁未", "庚申", "辛酉", "庚戌", "癸亥", "壬子", "癸丑",
];
/// 阴错日：农历正月至腊月各一
const YIN_GAP_CODES: [&str; 12] = [
    "庚戌", "辛酉", "庚申", "丁未", "丙午", "丁巳", "甲辰", "乙卯", "甲寅", "癸丑", "壬子", "癸亥",
];

static YANG_GAP_TABLE: Lazy<Vec<GanZhi>> = Lazy::new(|| parse_codes(&YANG_GAP_CODES));
static YIN_GAP_TABLE: Lazy<Vec<GanZhi>> = Lazy::new(|| parse_codes(&YIN_GAP_CODES));

fn parse_codes(codes: &[&str]) -> Vec<GanZhi> {
    codes.iter().map(|code| code.parse().unwrap()).collect()
}

/// 干支戒期计算器
pub struct SexagenaryCalculator;

impl RuleCalculator for SexagenaryCalculator {
    const TYPE_NAME: &'static str = "干支";

    fn calculate(ctx: &CalculationContext<'_>) -> PreceptResult<Vec<RuleAnnotation>> {
        let gan_zhi = ctx.calendar.gan_zhi;
        let mut annotations = Vec::new();

        if gan_zhi == GanZhi::JIA_ZI {
            annotations.push(
                special_annotation("甲子日", "犯之减寿一年", SeverityLevel::Moderate, PreceptCategory::Astronomical)
                    .with_explanation("甲子日是六十甲子的首日，天干地支循环之始，具有特殊的神圣意义。此日天地元气更新，犯戒会严重损害寿命")
                    .with_suggestion("甲子日应严格持戒，可诵经礼佛，修身养性，顺应天地元气更新之机")
                    .with_tags(["甲子日", "六十甲子", "神圣日"]),
            );
        }
        if gan_zhi == GanZhi::GENG_SHEN {
            annotations.push(
                special_annotation("庚申日", "犯之减寿一年", SeverityLevel::Moderate, PreceptCategory::DeityInspection)
                    .with_explanation("庚申日是六十甲子中的重要日子，传说此日三尸神会上天庭奏报人间善恶。庚属金，申属猴，此日阴阳交替，犯戒会严重损害寿命")
                    .with_suggestion("庚申日应严格持戒，可诵经礼佛，反省己过，避免三尸神奏报恶行")
                    .with_tags(["庚申日", "三尸神", "神圣日"]),
            );
        }

        match gan_zhi.stem {
            HeavenlyStem::Bing | HeavenlyStem::Ding => annotations.push(
                special_annotation("丙丁日", "犯之得病", SeverityLevel::Minor, PreceptCategory::Astronomical)
                    .with_explanation("丙丁日是天干为丙或丁的日子，属火之日。火性炎上，易动心火，此日犯戒容易导致疾病缠身")
                    .with_suggestion("丙丁日应节制欲念，保持心平气和，可多食清淡食物，避免过度劳累，以防火邪侵扰")
                    .with_tags(["丙丁日", "火日", "天干日"]),
            ),
            HeavenlyStem::Xin => {
                let lunar = &ctx.calendar.lunar;
                annotations.push(
                    special_annotation("三辛日", "犯者减寿一年", SeverityLevel::Moderate, PreceptCategory::DeityInspection)
                        .with_explanation(format!(
                            "三辛日是每月天干为辛的日子（农历{}月{}，{}）。传统认为辛日为雷祖（九天应元雷声普化天尊）监观万天、亲察人间之日，宜斋戒祈福，犯戒会损害寿命",
                            lunar.month_name(),
                            lunar.day_name(),
                            gan_zhi
                        ))
                        .with_suggestion("三辛日应斋戒祈福，保持身心清净，可诵雷祖宝诰或行善积德，以求消灾延寿")
                        .with_tags(["三辛日", "雷祖"]),
                );
            }
            _ => {}
        }

        annotations.extend(Self::gap_day(ctx, &YANG_GAP_TABLE, GapKind::Yang));
        annotations.extend(Self::gap_day(ctx, &YIN_GAP_TABLE, GapKind::Yin));

        Ok(annotations)
    }
}

#[derive(Debug, Clone, Copy)]
enum GapKind {
    Yang,
    Yin,
}

impl SexagenaryCalculator {
    /// 阴阳错日；闰月按本月号查表
    fn gap_day(
        ctx: &CalculationContext<'_>,
        table: &[GanZhi],
        kind: GapKind,
    ) -> Option<RuleAnnotation> {
        let lunar = &ctx.calendar.lunar;
        let expected = table.get(usize::from(lunar.month).checked_sub(1)?)?;
        if *expected != ctx.calendar.gan_zhi {
            return None;
        }

        let (reason, punishment, detail, suggestion) = match kind {
            GapKind::Yang => (
                "阳错日",
                "此阳不足之日，俱宜戒",
                "此日为阳气不足、阴阳失调之时，犯戒易损伤阳气，导致运势不顺",
                "阳错日应保持内心平静，避免冲动行事，可静心养神，积蓄阳气，以调和阴阳",
            ),
            GapKind::Yin => (
                "阴错日",
                "此阴不足之日，俱宜戒",
                "此日为阴气不足、阴阳失调之时，犯戒易损伤阴气，导致精神疲惫",
                "阴错日应保持内心安宁，避免过度消耗，可静心休养，滋阴养血，以调和阴阳",
            ),
        };

        Some(
            special_annotation(reason, punishment, SeverityLevel::Minor, PreceptCategory::Astronomical)
                .with_explanation(format!(
                    "{}是农历{}月的特定干支日（{}）。{}",
                    reason,
                    lunar.month_name().trim_start_matches('闰'),
                    expected,
                    detail
                ))
                .with_suggestion(suggestion)
                .with_tags([reason, "阴阳不足", "天干地支"]),
        )
    }
}
