//! 动态戒期计算模块
//! 节气、节日、干支、月相四类规则，均只依赖农历能力接口；各计算器互相独立，同一日可同时命中多条

pub mod cycle_search;
pub mod festival;
pub mod lunar_phase;
pub mod sexagenary;
pub mod solar_term;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::PreceptResult;
use crate::provider::{CalendarDate, LunarDateProvider};
use crate::rule::model::{PreceptCategory, PreceptKind, RuleAnnotation, SeverityLevel};

pub use self::cycle_search::nth_matching_day_after;
pub use self::festival::FestivalCalculator;
pub use self::lunar_phase::LunarPhaseCalculator;
pub use self::sexagenary::SexagenaryCalculator;
pub use self::solar_term::SolarTermCalculator;

/// 单次计算的上下文：已解析的日历信息 + 数据源 + 配置
#[derive(Clone, Copy)]
pub struct CalculationContext<'a> {
    pub calendar: &'a CalendarDate,
    pub provider: &'a dyn LunarDateProvider,
    pub config: &'a EngineConfig,
}

impl<'a> CalculationContext<'a> {
    pub fn new(
        calendar: &'a CalendarDate,
        provider: &'a dyn LunarDateProvider,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            calendar,
            provider,
            config,
        }
    }
}

/// 所有动态计算器的通用抽象
///
/// "规则不适用"返回空列表，错误通道只用于数据源越界与干支搜索失败。
pub trait RuleCalculator {
    /// 计算器名称，用于日志输出
    const TYPE_NAME: &'static str;

    /// 计算当日命中的全部注释
    fn calculate(ctx: &CalculationContext<'_>) -> PreceptResult<Vec<RuleAnnotation>>;

    /// 执行计算并记录命中情况
    fn run(ctx: &CalculationContext<'_>) -> PreceptResult<Vec<RuleAnnotation>>
    where
        Self: Sized,
    {
        let annotations = Self::calculate(ctx)?;
        if !annotations.is_empty() {
            debug!(
                "{}规则命中：日期={}，条数={}",
                Self::TYPE_NAME,
                ctx.calendar.date,
                annotations.len()
            );
        }
        Ok(annotations)
    }
}

/// 构建动态戒期注释
pub(crate) fn special_annotation(
    reason: impl Into<String>,
    punishment: impl Into<String>,
    severity: SeverityLevel,
    category: PreceptCategory,
) -> RuleAnnotation {
    RuleAnnotation::new(reason, punishment, severity, category, PreceptKind::Special)
}
