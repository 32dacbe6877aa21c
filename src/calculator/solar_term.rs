//! 节气戒期计算器
//! 八节当日、二分二至前后三日、四绝四离、冬至后第三戌日、冬至后庚辛日，各规则独立判定

use std::sync::Arc;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::cycle_search::nth_matching_day_after;
use super::{CalculationContext, RuleCalculator, special_annotation};
use crate::error::PreceptResult;
use crate::parser::categorizer::{solar_term_group, solar_term_tags};
use crate::provider::{EarthlyBranch, HeavenlyStem, SolarTerm, SolarTermDay};
use crate::rule::model::{PreceptCategory, RuleAnnotation, SeverityLevel};

/// 八节当日规则：节气 -> (原因, 惩罚, 说明, 建议)
const TERM_DAY_RULES: &[(SolarTerm, &str, &str, &str, &str)] = &[
    (
        SolarTerm::ChunFen,
        "二分日",
        "犯者生子五官四肢不全，父母有灾",
        "春分日雷将发声，天地阴阳二气开始激烈交战，此日犯戒会影响后代健康，给父母带来灾祸。宜从惊蛰节禁起，戒过一月",
        "春分前应从惊蛰节开始禁戒，持戒一个月，可诵经礼佛，修身养性，避免雷震之灾",
    ),
    (
        SolarTerm::QiuFen,
        "二分日",
        "犯者必得危疾",
        "秋分日杀气浸盛，阳气逐渐衰退，阴气渐长，此日犯戒会严重损害身体健康。宜从白露节禁起，戒过一月",
        "秋分前应从白露节开始禁戒，持戒一个月，可诵经礼佛，收敛心神，顺应天时",
    ),
    (
        SolarTerm::XiaZhi,
        "二至日",
        "犯者必得急疾",
        "夏至日阴阳相争，是死生分判的关键时刻，此日犯戒会招致急重疾病。宜从芒种节禁起，戒过一月",
        "夏至前应从芒种节开始禁戒，持戒一个月，可静坐养心，避免阴阳失调",
    ),
    (
        SolarTerm::DongZhi,
        "二至日",
        "犯者必得急疾",
        "冬至日阴阳相争，是死生分判的关键时刻，此日犯戒会招致急重疾病。冬至半夜子时犯之，并冬至后庚辛日，及第三戌日犯之，皆主在一年内亡。宜从大雪节禁起，戒过一月",
        "冬至前应从大雪节开始禁戒，持戒一个月，可静坐养心，潜藏阳气",
    ),
    (
        SolarTerm::LiChun,
        "四立日",
        "犯之减寿五年",
        "立春是二十四节气之首，春季的开始，天地阳气初生，万物复苏。此日犯戒会严重影响寿命，减寿五年",
        "立春是二十四节气之首，春季的开始，犯之减寿五年，应严格持戒",
    ),
    (
        SolarTerm::LiXia,
        "四立日",
        "犯之减寿五年",
        "立夏是夏季的开始，天地阳气旺盛，万物生长茂盛。此日犯戒会严重影响寿命，减寿五年",
        "立夏是夏季的开始，犯之减寿五年，应严格持戒",
    ),
    (
        SolarTerm::LiQiu,
        "四立日",
        "犯之减寿五年",
        "立秋是秋季的开始，天地阳气渐收，阴气渐长。此日犯戒会严重影响寿命，减寿五年",
        "立秋是秋季的开始，犯之减寿五年，应严格持戒",
    ),
    (
        SolarTerm::LiDong,
        "四立日",
        "犯之减寿五年",
        "立冬是冬季的开始，天地阳气潜藏，阴气盛极。此日犯戒会严重影响寿命，减寿五年",
        "立冬是冬季的开始，犯之减寿五年，应严格持戒",
    ),
];

/// 二分二至前后戒期的最大天数
const PROXIMITY_DAYS: i64 = 3;
/// 冬至后第几个戌日
const XU_DAY_ORDINAL: u32 = 3;
const WITHIN_ONE_YEAR: &str = "犯者一年内亡";
const ONE_YEAR_SUGGESTION: &str = "此日应严格持戒，可诵经礼佛，修身养性，避免一切不当行为，以保平安";

/// 节气戒期计算器
pub struct SolarTermCalculator;

impl RuleCalculator for SolarTermCalculator {
    const TYPE_NAME: &'static str = "节气";

    fn calculate(ctx: &CalculationContext<'_>) -> PreceptResult<Vec<RuleAnnotation>> {
        let date = ctx.calendar.date;
        let terms = ctx.provider.solar_terms_of_year(date.year())?;
        let mut annotations = Vec::new();

        if let Some(term) = ctx.calendar.solar_term {
            annotations.extend(Self::term_day(term));
        }
        annotations.extend(Self::proximity(date, &terms));
        annotations.extend(Self::day_before_term(date, &terms));
        annotations.extend(Self::third_xu_day(ctx, &terms)?);
        annotations.extend(Self::geng_xin_day(ctx, &terms)?);

        Ok(annotations)
    }
}

impl SolarTermCalculator {
    /// 八节当日
    fn term_day(term: SolarTerm) -> Option<RuleAnnotation> {
        let (_, reason, punishment, explanation, suggestion) =
            TERM_DAY_RULES.iter().find(|rule| rule.0 == term)?;
        Some(
            special_annotation(*reason, *punishment, SeverityLevel::Major, PreceptCategory::SolarTerm)
                .with_explanation(*explanation)
                .with_suggestion(*suggestion)
                .with_tags(solar_term_tags(term)),
        )
    }

    /// 二分二至前后三日（不含当日）
    fn proximity(date: NaiveDate, terms: &[SolarTermDay]) -> Option<RuleAnnotation> {
        terms
            .iter()
            .filter(|t| t.term.is_equinox_or_solstice())
            .find_map(|t| {
                let diff = (date - t.date).num_days();
                if diff == 0 || diff.abs() > PROXIMITY_DAYS {
                    return None;
                }
                let direction = if diff < 0 { "前" } else { "后" };
                let punishment = match t.term {
                    SolarTerm::ChunFen | SolarTerm::QiuFen => "犯者必得危疾，尤宜切戒",
                    _ => "犯者必得急疾，尤宜切戒",
                };
                let group = solar_term_group(t.term).unwrap_or_default();

                Some(
                    special_annotation(
                        format!("{}{}{}日", t.term, direction, diff.abs()),
                        punishment,
                        SeverityLevel::Major,
                        PreceptCategory::SolarTerm,
                    )
                    .with_explanation(format!(
                        "此节气之前三后三共七日，{}时节阴阳二气相交变化剧烈，犯戒易得疾病",
                        t.term
                    ))
                    .with_suggestion("应在节气前后严格持戒，可诵经祈福，修身养性，避免阴阳失调")
                    .with_tags([t.term.name(), group, "前后戒期"]),
                )
            })
    }

    /// 四绝日（四立前一日）与四离日（二分二至前一日）
    fn day_before_term(date: NaiveDate, terms: &[SolarTermDay]) -> Vec<RuleAnnotation> {
        terms
            .iter()
            .filter(|t| (t.date - date).num_days() == 1)
            .filter_map(|t| {
                let (name, meaning) = if t.term.is_season_start() {
                    ("四绝日", "天地阴阳二气交替，万物更新")
                } else if t.term.is_equinox_or_solstice() {
                    ("四离日", "天地阴阳二气分离，万物转换")
                } else {
                    return None;
                };

                Some(
                    special_annotation(name, "犯之减寿五年", SeverityLevel::Major, PreceptCategory::SolarTerm)
                        .with_explanation(format!(
                            "此日为{}的前一日，属{}之一。{}是季节交替的关键时刻，{}，犯戒会严重影响寿命",
                            t.term, name, name, meaning
                        ))
                        .with_suggestion(format!(
                            "{}应严格持戒，可诵经礼佛，修身养性，避免一切不当行为",
                            name
                        ))
                        .with_tags([name, t.term.name()]),
                )
            })
            .collect()
    }

    /// 冬至后第三戌日（本年与上年冬至各查一次）
    fn third_xu_day(
        ctx: &CalculationContext<'_>,
        terms: &[SolarTermDay],
    ) -> PreceptResult<Option<RuleAnnotation>> {
        let date = ctx.calendar.date;
        if ctx.calendar.gan_zhi.branch != EarthlyBranch::Xu {
            return Ok(None);
        }

        let previous = adjacent_year_terms(ctx, date.year() - 1)?;
        let anchors = [
            find_term(terms, SolarTerm::DongZhi),
            previous.and_then(|t| find_term(&t, SolarTerm::DongZhi)),
        ];
        let window = ctx.config.cycle_scan_window_days;

        for anchor in anchors.into_iter().flatten() {
            let elapsed = (date - anchor).num_days();
            if elapsed <= 0 || elapsed > i64::from(window) {
                continue;
            }
            let xu_day = nth_matching_day_after(ctx.provider, anchor, XU_DAY_ORDINAL, window, |gz| {
                gz.branch == EarthlyBranch::Xu
            })?;
            if xu_day == date {
                return Ok(Some(
                    special_annotation("冬至后第三戌日", WITHIN_ONE_YEAR, SeverityLevel::Major, PreceptCategory::SolarTerm)
                        .with_explanation(format!(
                            "此日为冬至后的第三个戌日（{}）。《寿康宝鉴》记载：冬至后第三戌日犯之，主在一年内亡。此日为冬至后阴阳交替的关键时刻，犯戒后果极为严重",
                            ctx.calendar.gan_zhi
                        ))
                        .with_suggestion(ONE_YEAR_SUGGESTION)
                        .with_tags(["冬至", "戌日", "大凶日"]),
                ));
            }
        }
        Ok(None)
    }

    /// 冬至后庚辛日：冬至与次年立春之间（均不含）
    fn geng_xin_day(
        ctx: &CalculationContext<'_>,
        terms: &[SolarTermDay],
    ) -> PreceptResult<Option<RuleAnnotation>> {
        let date = ctx.calendar.date;
        let gan_zhi = ctx.calendar.gan_zhi;
        if !matches!(gan_zhi.stem, HeavenlyStem::Geng | HeavenlyStem::Xin) {
            return Ok(None);
        }

        let year = date.year();
        let mut in_window = false;

        // 上年冬至 -> 本年立春
        if let Some(li_chun) = find_term(terms, SolarTerm::LiChun).filter(|&d| date < d) {
            let previous = adjacent_year_terms(ctx, year - 1)?;
            if let Some(dong_zhi) = previous.and_then(|t| find_term(&t, SolarTerm::DongZhi)) {
                in_window = date > dong_zhi && date < li_chun;
            }
        }
        // 本年冬至 -> 次年立春
        if !in_window {
            if let Some(dong_zhi) = find_term(terms, SolarTerm::DongZhi).filter(|&d| date > d) {
                let next = adjacent_year_terms(ctx, year + 1)?;
                if let Some(li_chun) = next.and_then(|t| find_term(&t, SolarTerm::LiChun)) {
                    in_window = date > dong_zhi && date < li_chun;
                }
            }
        }

        if !in_window {
            return Ok(None);
        }
        Ok(Some(
            special_annotation("冬至后庚辛日", WITHIN_ONE_YEAR, SeverityLevel::Major, PreceptCategory::SolarTerm)
                .with_explanation(format!(
                    "此日为冬至到立春之间的{}日（{}）。《寿康宝鉴》记载：冬至后庚辛日犯之，主在一年内亡。冬至后阳气初生，庚辛属金，金气肃杀，此时犯戒后果极为严重",
                    gan_zhi.stem.as_char(),
                    gan_zhi
                ))
                .with_suggestion(ONE_YEAR_SUGGESTION)
                .with_tags(["冬至", "庚辛日", "大凶日"]),
        ))
    }
}

fn find_term(terms: &[SolarTermDay], term: SolarTerm) -> Option<NaiveDate> {
    terms.iter().find(|t| t.term == term).map(|t| t.date)
}

/// 相邻年份的节气；数据源未覆盖该年时视为无节气
fn adjacent_year_terms(
    ctx: &CalculationContext<'_>,
    year: i32,
) -> PreceptResult<Option<Arc<[SolarTermDay]>>> {
    match ctx.provider.solar_terms_of_year(year) {
        Ok(terms) => Ok(Some(terms)),
        Err(e) if e.is_recoverable() => {
            debug!("{}年节气不可用，跳过跨年规则：{}", year, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
