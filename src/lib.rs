//! precept-engine - 农历戒期规则引擎
//!
//! 给定公历日期，汇总固定戒期表、十斋日、节气、节日、干支与月相规则命中的全部戒期注释。
//! 农历换算能力由调用方通过 [`LunarDateProvider`] 注入，引擎本身不做天文计算。

// 导出全局错误类型
pub use self::error::{PreceptError, PreceptResult};

// 导出配置模块
pub use self::config::{ConfigBuilder, ConfigManager, EngineConfig, SeverityPolicy};

// 导出规则模块核心接口
pub use self::rule::{
    FixedRuleEntry, FixedRuleTable, PreceptCategory, PreceptKind, RawRuleText, RuleAnnotation,
    SeverityLevel, SeverityStats, TEN_DAY_FAST_DAYS,
};

// 导出解析模块核心接口
pub use self::parser::{
    CompiledRuleTable, GENERIC_ADVISORY, RuleTableCompiler, RuleTextParser, classify_severity,
    resolve_severity,
};

// 导出农历数据源接口
pub use self::provider::{
    AlmanacCache, AlmanacData, AlmanacDay, AlmanacLoader, AlmanacMonth, AlmanacProvider,
    CalendarDate, DogDay, DogDayPeriod, EarthlyBranch, GanZhi, HeavenlyStem, LunarDate,
    LunarDateProvider, MemoizedProvider, SolarTerm, SolarTermDay,
};

// 导出动态计算器
pub use self::calculator::{
    CalculationContext, FestivalCalculator, LunarPhaseCalculator, RuleCalculator,
    SexagenaryCalculator, SolarTermCalculator, nth_matching_day_after,
};

// 导出引擎门面
pub use self::engine::{DayAnnotations, MonthSummary, PreceptEngine, max_severity_of};

// 声明所有子模块
pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod provider;
pub mod rule;
