//! 全局配置管理,存储引擎所有可配置项

use serde::{Deserialize, Serialize};

/// 显式等级与推导等级冲突时的全局取舍策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityPolicy {
    /// 规则表中的显式等级优先，缺省时才按惩罚文本推导
    #[default]
    ExplicitOverride,
    /// 一律按惩罚文本推导，忽略显式等级
    AlwaysDerive,
}

/// 引擎配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    // 严格模式：日期越界时直接返回错误而不降级
    pub strict: bool,
    // 等级取舍策略
    pub severity_policy: SeverityPolicy,
    // 第N个干支日搜索的扫描窗口（单位：日）
    pub cycle_scan_window_days: u32,
    // 支持的公历年份范围（闭区间），None表示不限制
    pub supported_years: Option<(i32, i32)>,
    // 注释来源标注
    pub source_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict: false,
            severity_policy: SeverityPolicy::default(),
            cycle_scan_window_days: 120,
            supported_years: None,
            source_label: "《寿康宝鉴》".to_string(),
        }
    }
}

impl EngineConfig {
    /// 年份是否在支持范围内
    pub fn supports_year(&self, year: i32) -> bool {
        match self.supported_years {
            Some((start, end)) => (start..=end).contains(&year),
            None => true,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> EngineConfig {
        EngineConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: EngineConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    pub fn severity_policy(mut self, policy: SeverityPolicy) -> Self {
        self.config.severity_policy = policy;
        self
    }

    pub fn cycle_scan_window_days(mut self, days: u32) -> Self {
        self.config.cycle_scan_window_days = days;
        self
    }

    /// 限制查询年份（闭区间）
    pub fn supported_years(mut self, start: i32, end: i32) -> Self {
        self.config.supported_years = Some((start.min(end), start.max(end)));
        self
    }

    pub fn source_label(mut self, label: impl Into<String>) -> Self {
        self.config.source_label = label.into();
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}
