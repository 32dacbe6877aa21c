//! 农历能力接口
//! 引擎只通过 LunarDateProvider 消费公历/农历换算、干支、月长、节气与三伏数据，自身不做天文计算

use std::fmt;
use std::sync::Arc;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ganzhi::GanZhi;
use super::term::{DogDay, SolarTerm, SolarTermDay};
use crate::error::{PreceptError, PreceptResult};

const MONTH_NAMES: [&str; 13] = ["", "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "冬", "腊"];
const DAY_TENS: [&str; 4] = ["初", "十", "廿", "三"];
const DAY_UNITS: [&str; 10] = ["", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 农历日期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    #[serde(default)]
    pub is_leap: bool,
}

impl LunarDate {
    pub fn new(year: i32, month: u8, day: u8, is_leap: bool) -> Self {
        Self {
            year,
            month,
            day,
            is_leap,
        }
    }

    /// 中文月名（正、二……冬、腊），闰月加"闰"
    pub fn month_name(&self) -> String {
        let name = MONTH_NAMES
            .get(self.month as usize)
            .copied()
            .unwrap_or_default();
        if self.is_leap {
            format!("闰{}", name)
        } else {
            name.to_string()
        }
    }

    /// 中文日名（初一……三十）
    pub fn day_name(&self) -> String {
        match self.day {
            10 => "初十".to_string(),
            20 => "二十".to_string(),
            30 => "三十".to_string(),
            d if (1..30).contains(&d) => {
                format!("{}{}", DAY_TENS[(d / 10) as usize], DAY_UNITS[(d % 10) as usize])
            }
            d => d.to_string(),
        }
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "农历{}年{}月{}", self.year, self.month_name(), self.day_name())
    }
}

/// 单次查询解析出的完整日历信息（不持久化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub date: NaiveDate,
    pub lunar: LunarDate,
    pub gan_zhi: GanZhi,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_term: Option<SolarTerm>,
}

impl CalendarDate {
    /// 在已知农历日期的前提下补全干支与节气
    pub fn resolve(
        provider: &dyn LunarDateProvider,
        date: NaiveDate,
        lunar: LunarDate,
    ) -> PreceptResult<Self> {
        Ok(Self {
            date,
            lunar,
            gan_zhi: provider.day_gan_zhi(date)?,
            solar_term: provider.solar_term_on_date(date)?,
        })
    }
}

/// 农历/天文能力接口
///
/// 无法换算的日期一律返回 `PreceptError::DateOutOfRange`，"规则不适用"不走错误通道。
pub trait LunarDateProvider: Send + Sync {
    /// 公历转农历
    fn to_lunar(&self, date: NaiveDate) -> PreceptResult<LunarDate>;

    /// 日干支
    fn day_gan_zhi(&self, date: NaiveDate) -> PreceptResult<GanZhi>;

    /// 农历月天数（29 或 30）
    fn month_length(&self, lunar_year: i32, lunar_month: u8, is_leap: bool) -> PreceptResult<u8>;

    /// 当日是否为节气日
    fn solar_term_on_date(&self, date: NaiveDate) -> PreceptResult<Option<SolarTerm>>;

    /// 三伏查询
    fn dog_day(&self, date: NaiveDate) -> PreceptResult<Option<DogDay>>;

    /// 公历某年的全部节气（按日期升序）
    ///
    /// 默认实现逐日扫描全年；单日越界时跳过，全年均越界时返回 `DateOutOfRange`。
    fn solar_terms_of_year(&self, year: i32) -> PreceptResult<Arc<[SolarTermDay]>> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| PreceptError::InvalidInput(format!("年份超出公历表示范围：{}", year)))?;

        let mut terms = Vec::with_capacity(24);
        let mut resolved_any = false;
        for date in first.iter_days().take_while(|d| d.year() == year) {
            match self.solar_term_on_date(date) {
                Ok(Some(term)) => {
                    resolved_any = true;
                    terms.push(SolarTermDay { term, date });
                }
                Ok(None) => resolved_any = true,
                Err(e) if e.is_recoverable() => continue,
                Err(e) => return Err(e),
            }
        }

        if !resolved_any {
            return Err(PreceptError::out_of_range(first, format!("{}年无可用节气数据", year)));
        }
        Ok(terms.into())
    }
}

impl<P: LunarDateProvider + ?Sized> LunarDateProvider for Arc<P> {
    fn to_lunar(&self, date: NaiveDate) -> PreceptResult<LunarDate> {
        (**self).to_lunar(date)
    }

    fn day_gan_zhi(&self, date: NaiveDate) -> PreceptResult<GanZhi> {
        (**self).day_gan_zhi(date)
    }

    fn month_length(&self, lunar_year: i32, lunar_month: u8, is_leap: bool) -> PreceptResult<u8> {
        (**self).month_length(lunar_year, lunar_month, is_leap)
    }

    fn solar_term_on_date(&self, date: NaiveDate) -> PreceptResult<Option<SolarTerm>> {
        (**self).solar_term_on_date(date)
    }

    fn dog_day(&self, date: NaiveDate) -> PreceptResult<Option<DogDay>> {
        (**self).dog_day(date)
    }

    fn solar_terms_of_year(&self, year: i32) -> PreceptResult<Arc<[SolarTermDay]>> {
        (**self).solar_terms_of_year(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese_month_and_day_names() {
        let date = LunarDate::new(2024, 1, 1, false);
        assert_eq!(date.month_name(), "正");
        assert_eq!(date.day_name(), "初一");

        assert_eq!(LunarDate::new(2024, 11, 10, false).to_string(), "农历2024年冬月初十");
        assert_eq!(LunarDate::new(2024, 12, 23, false).day_name(), "廿三");
        assert_eq!(LunarDate::new(2024, 12, 30, false).day_name(), "三十");
        assert_eq!(LunarDate::new(2023, 2, 15, true).month_name(), "闰二");
    }
}
