//! 历书数据源
//! 从预先计算好的历书（逐日农历、干支、节气、三伏，逐月月长）提供农历能力

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ganzhi::GanZhi;
use super::lunar::{LunarDate, LunarDateProvider};
use super::term::{DogDay, SolarTerm, SolarTermDay};
use crate::error::{PreceptError, PreceptResult};

/// 历书中的一日
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlmanacDay {
    pub date: NaiveDate,
    pub lunar: LunarDate,
    pub gan_zhi: GanZhi,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_term: Option<SolarTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dog_day: Option<DogDay>,
}

/// 历书中的一个农历月
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlmanacMonth {
    pub year: i32,
    pub month: u8,
    #[serde(default)]
    pub is_leap: bool,
    pub length: u8,
}

/// 历书原始数据（JSON / MessagePack 共用结构）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlmanacData {
    pub days: Vec<AlmanacDay>,
    pub months: Vec<AlmanacMonth>,
}

/// 基于历书的农历数据源
#[derive(Debug, Clone)]
pub struct AlmanacProvider {
    data: Arc<AlmanacData>,
    day_index: HashMap<NaiveDate, usize>,
    month_lengths: HashMap<(i32, u8, bool), u8>,
    terms_by_year: BTreeMap<i32, Arc<[SolarTermDay]>>,
}

impl AlmanacProvider {
    /// 从历书数据构建，校验月长与日期唯一性
    pub fn from_data(data: AlmanacData) -> PreceptResult<Self> {
        let mut month_lengths = HashMap::with_capacity(data.months.len());
        for month in &data.months {
            if !(29..=30).contains(&month.length) || !(1..=12).contains(&month.month) {
                return Err(PreceptError::AlmanacLoadError(format!(
                    "农历{}年{}月数据非法：月长{}",
                    month.year, month.month, month.length
                )));
            }
            month_lengths.insert((month.year, month.month, month.is_leap), month.length);
        }

        let mut day_index = HashMap::with_capacity(data.days.len());
        let mut terms: BTreeMap<i32, Vec<SolarTermDay>> = BTreeMap::new();
        for (i, day) in data.days.iter().enumerate() {
            if day_index.insert(day.date, i).is_some() {
                return Err(PreceptError::AlmanacLoadError(format!("日期重复：{}", day.date)));
            }
            // 已覆盖的年份即使没有节气也要占位
            let year_terms = terms.entry(day.date.year()).or_default();
            if let Some(term) = day.solar_term {
                year_terms.push(SolarTermDay { term, date: day.date });
            }
        }

        let terms_by_year: BTreeMap<i32, Arc<[SolarTermDay]>> = terms
            .into_iter()
            .map(|(year, mut list)| {
                list.sort_by_key(|t| t.date);
                (year, Arc::from(list))
            })
            .collect();

        debug!(
            "历书加载完成：{}日，{}个农历月",
            data.days.len(),
            data.months.len()
        );

        Ok(Self {
            data: Arc::new(data),
            day_index,
            month_lengths,
            terms_by_year,
        })
    }

    /// 从JSON文本构建
    pub fn from_json_str(json: &str) -> PreceptResult<Self> {
        let data: AlmanacData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// 原始历书数据（用于写入缓存）
    pub fn data(&self) -> &AlmanacData {
        &self.data
    }

    /// 覆盖的公历日期范围
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.day_index.keys().min()?;
        let max = self.day_index.keys().max()?;
        Some((*min, *max))
    }

    fn day(&self, date: NaiveDate) -> PreceptResult<&AlmanacDay> {
        self.day_index
            .get(&date)
            .and_then(|&i| self.data.days.get(i))
            .ok_or_else(|| PreceptError::out_of_range(date, "历书未覆盖该日期"))
    }
}

impl LunarDateProvider for AlmanacProvider {
    fn to_lunar(&self, date: NaiveDate) -> PreceptResult<LunarDate> {
        Ok(self.day(date)?.lunar)
    }

    fn day_gan_zhi(&self, date: NaiveDate) -> PreceptResult<GanZhi> {
        Ok(self.day(date)?.gan_zhi)
    }

    fn month_length(&self, lunar_year: i32, lunar_month: u8, is_leap: bool) -> PreceptResult<u8> {
        self.month_lengths
            .get(&(lunar_year, lunar_month, is_leap))
            .copied()
            .ok_or_else(|| {
                let anchor = NaiveDate::from_ymd_opt(lunar_year, 1, 1).unwrap_or(NaiveDate::MIN);
                PreceptError::out_of_range(
                    anchor,
                    format!("历书缺少农历{}年{}月月长", lunar_year, lunar_month),
                )
            })
    }

    fn solar_term_on_date(&self, date: NaiveDate) -> PreceptResult<Option<SolarTerm>> {
        Ok(self.day(date)?.solar_term)
    }

    fn dog_day(&self, date: NaiveDate) -> PreceptResult<Option<DogDay>> {
        Ok(self.day(date)?.dog_day)
    }

    fn solar_terms_of_year(&self, year: i32) -> PreceptResult<Arc<[SolarTermDay]>> {
        self.terms_by_year.get(&year).cloned().ok_or_else(|| {
            let anchor = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
            PreceptError::out_of_range(anchor, format!("历书未覆盖{}年", year))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "days": [
            {"date": "2024-03-19", "lunar": {"year": 2024, "month": 2, "day": 10}, "gan_zhi": "壬午"},
            {"date": "2024-03-20", "lunar": {"year": 2024, "month": 2, "day": 11}, "gan_zhi": "癸未", "solar_term": "春分"},
            {"date": "2024-07-25", "lunar": {"year": 2024, "month": 6, "day": 20}, "gan_zhi": "庚寅", "dog_day": {"period": "中伏", "day": 1}}
        ],
        "months": [
            {"year": 2024, "month": 2, "length": 30},
            {"year": 2024, "month": 6, "length": 30}
        ]
    }"#;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lookup_from_json() {
        let provider = AlmanacProvider::from_json_str(SAMPLE).unwrap();
        assert_eq!(provider.to_lunar(ymd(2024, 3, 20)).unwrap(), LunarDate::new(2024, 2, 11, false));
        assert_eq!(provider.day_gan_zhi(ymd(2024, 3, 20)).unwrap().to_string(), "癸未");
        assert_eq!(provider.solar_term_on_date(ymd(2024, 3, 20)).unwrap(), Some(SolarTerm::ChunFen));
        assert_eq!(provider.solar_term_on_date(ymd(2024, 3, 19)).unwrap(), None);
        assert_eq!(provider.month_length(2024, 2, false).unwrap(), 30);
        assert!(provider.dog_day(ymd(2024, 7, 25)).unwrap().is_some());
        assert_eq!(provider.date_range(), Some((ymd(2024, 3, 19), ymd(2024, 7, 25))));
    }

    #[test]
    fn test_uncovered_dates_are_out_of_range() {
        let provider = AlmanacProvider::from_json_str(SAMPLE).unwrap();
        assert!(provider.to_lunar(ymd(2024, 3, 21)).unwrap_err().is_recoverable());
        assert!(provider.month_length(2024, 3, false).unwrap_err().is_recoverable());
        assert!(provider.solar_terms_of_year(2023).unwrap_err().is_recoverable());

        let terms = provider.solar_terms_of_year(2024).unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].term, SolarTerm::ChunFen);
    }

    #[test]
    fn test_invalid_month_length_rejected() {
        let json = r#"{"days": [], "months": [{"year": 2024, "month": 1, "length": 31}]}"#;
        let err = AlmanacProvider::from_json_str(json).unwrap_err();
        assert!(matches!(err, PreceptError::AlmanacLoadError(_)));
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let json = r#"{"days": [
            {"date": "2024-03-19", "lunar": {"year": 2024, "month": 2, "day": 10}, "gan_zhi": "壬午"},
            {"date": "2024-03-19", "lunar": {"year": 2024, "month": 2, "day": 10}, "gan_zhi": "壬午"}
        ], "months": []}"#;
        assert!(AlmanacProvider::from_json_str(json).is_err());
    }
}
