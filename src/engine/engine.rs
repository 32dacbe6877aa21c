//! 戒期引擎门面
//! 单日流程：解析农历 -> 固定戒期表 -> 十斋日 -> 节气/节日/干支/月相计算器，按固定顺序拼接

use std::sync::Arc;
use std::time::Instant;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculator::{
    CalculationContext, FestivalCalculator, LunarPhaseCalculator, RuleCalculator,
    SexagenaryCalculator, SolarTermCalculator,
};
use crate::config::EngineConfig;
use crate::error::{PreceptError, PreceptResult};
use crate::parser::{CompiledRuleTable, RuleTableCompiler};
use crate::provider::{CalendarDate, LunarDate, LunarDateProvider, MemoizedProvider};
use crate::rule::model::{
    PreceptCategory, PreceptKind, RuleAnnotation, SeverityLevel, SeverityStats,
};
use crate::rule::table::FixedRuleTable;

/// 单日注释视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAnnotations {
    pub date: NaiveDate,
    /// 农历信息解析失败（非严格模式降级）时为空
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarDate>,
    pub annotations: Vec<RuleAnnotation>,
    pub max_severity: SeverityLevel,
}

/// 公历月汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayAnnotations>,
    /// 按每日最高等级计数
    pub stats: SeverityStats,
}

/// 注释列表的最高等级，空列表为安全
pub fn max_severity_of(annotations: &[RuleAnnotation]) -> SeverityLevel {
    annotations
        .iter()
        .map(|a| a.severity)
        .max()
        .unwrap_or(SeverityLevel::Safe)
}

/// 戒期引擎
///
/// 构建时预编译固定戒期表，之后只读；可在多线程间共享。
pub struct PreceptEngine {
    provider: Arc<MemoizedProvider>,
    compiled: Arc<CompiledRuleTable>,
    config: EngineConfig,
}

impl PreceptEngine {
    /// 使用内置戒期表创建引擎
    pub fn new(provider: Arc<dyn LunarDateProvider>, config: EngineConfig) -> PreceptResult<Self> {
        let table = FixedRuleTable::embedded()?;
        Ok(Self::with_table(provider, table, config))
    }

    /// 使用自定义戒期表创建引擎
    pub fn with_table(
        provider: Arc<dyn LunarDateProvider>,
        table: &FixedRuleTable,
        config: EngineConfig,
    ) -> Self {
        let start = Instant::now();
        let compiled = RuleTableCompiler::compile(table, config.severity_policy);
        debug!(
            "✅ 戒期引擎初始化完成，固定戒期{}条，等级策略={:?}，严格模式={}，耗时{:?}",
            compiled.stats().total,
            config.severity_policy,
            config.strict,
            start.elapsed()
        );

        Self {
            provider: Arc::new(MemoizedProvider::new(provider)),
            compiled: Arc::new(compiled),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 记忆化后的数据源
    pub fn provider(&self) -> &MemoizedProvider {
        &self.provider
    }

    /// 预先计算若干年份的节气
    pub fn preload_years(&self, years: impl IntoIterator<Item = i32>) -> PreceptResult<()> {
        self.provider.preload(years)
    }

    /// 某日的全部戒期注释（不过滤、不去重）
    pub fn annotate(&self, date: NaiveDate) -> PreceptResult<Vec<RuleAnnotation>> {
        self.evaluate(date).map(|(_, annotations)| annotations)
    }

    /// 某日的最高戒期等级
    pub fn max_severity(&self, date: NaiveDate) -> PreceptResult<SeverityLevel> {
        Ok(max_severity_of(&self.annotate(date)?))
    }

    /// 单日视图：日历信息 + 注释 + 最高等级
    pub fn annotate_day(&self, date: NaiveDate) -> PreceptResult<DayAnnotations> {
        let (calendar, annotations) = self.evaluate(date)?;
        let max_severity = max_severity_of(&annotations);
        Ok(DayAnnotations {
            date,
            calendar,
            annotations,
            max_severity,
        })
    }

    /// 公历某月逐日汇总
    pub fn month_summary(&self, year: i32, month: u32) -> PreceptResult<MonthSummary> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| PreceptError::InvalidInput(format!("无效的公历月份：{}年{}月", year, month)))?;

        let mut days = Vec::with_capacity(31);
        let mut stats = SeverityStats::default();
        for date in first.iter_days().take_while(|d| d.month() == month) {
            let day = self.annotate_day(date)?;
            stats.record(day.max_severity);
            days.push(day);
        }

        debug!(
            "📊 {}年{}月汇总：大戒{}日、中戒{}日、宜戒{}日、安全{}日",
            year, month, stats.major, stats.moderate, stats.minor, stats.safe
        );
        Ok(MonthSummary {
            year,
            month,
            days,
            stats,
        })
    }

    fn evaluate(&self, date: NaiveDate) -> PreceptResult<(Option<CalendarDate>, Vec<RuleAnnotation>)> {
        if !self.config.supports_year(date.year()) {
            return Err(PreceptError::out_of_range(date, "超出支持年份范围"));
        }

        // 1. 农历换算
        let lunar = match self.provider.to_lunar(date) {
            Ok(lunar) => lunar,
            Err(e) => {
                self.degrade(date, e)?;
                return Ok((None, Vec::new()));
            }
        };

        // 2. 固定戒期表（闰月按本月号查表）
        let mut annotations = self.compiled.lookup(lunar.month, lunar.day).to_vec();

        // 3. 十斋日
        if FixedRuleTable::is_ten_day_fast(lunar.day) {
            annotations.push(ten_day_fast_annotation(&lunar));
        }

        // 4. 动态规则
        let calendar = match CalendarDate::resolve(self.provider.as_ref(), date, lunar) {
            Ok(calendar) => Some(calendar),
            Err(e) => {
                self.degrade(date, e)?;
                None
            }
        };
        if let Some(calendar) = &calendar {
            match self.run_calculators(calendar) {
                Ok(dynamic) => annotations.extend(dynamic),
                Err(e) => self.degrade(date, e)?,
            }
        }

        let annotations = annotations
            .into_iter()
            .map(|a| a.with_source(self.config.source_label.as_str()))
            .collect();
        Ok((calendar, annotations))
    }

    fn run_calculators(&self, calendar: &CalendarDate) -> PreceptResult<Vec<RuleAnnotation>> {
        let ctx = CalculationContext::new(calendar, self.provider.as_ref(), &self.config);
        let mut annotations = SolarTermCalculator::run(&ctx)?;
        annotations.extend(FestivalCalculator::run(&ctx)?);
        annotations.extend(SexagenaryCalculator::run(&ctx)?);
        annotations.extend(LunarPhaseCalculator::run(&ctx)?);
        Ok(annotations)
    }

    /// 非严格模式下吞掉可恢复错误并告警，其余错误原样返回
    fn degrade(&self, date: NaiveDate, e: PreceptError) -> PreceptResult<()> {
        if self.config.strict || !e.is_recoverable() {
            return Err(e);
        }
        warn!("{}戒期计算降级：{}", date, e);
        Ok(())
    }
}

fn ten_day_fast_annotation(lunar: &LunarDate) -> RuleAnnotation {
    RuleAnnotation::new(
        "十斋日",
        "中罪",
        SeverityLevel::Moderate,
        PreceptCategory::Festival,
        PreceptKind::FastingDay,
    )
    .with_explanation(format!(
        "农历每月初一、初八、十四、十五、十八、廿三、廿四、廿八、廿九、三十为十斋日，今日为{}，宜持斋守戒",
        lunar.day_name()
    ))
    .with_suggestion("十斋日宜素食持斋，可诵经礼佛，修身养性")
    .with_tags(["十斋日", "斋日"])
}
