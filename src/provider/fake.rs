//! 测试用农历数据源
//! 农历月由显式的起始日与月长合成，节气与三伏取自显式表，日干支按儒略日推算

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use chrono::{Datelike, NaiveDate};

use super::ganzhi::GanZhi;
use super::lunar::{LunarDate, LunarDateProvider};
use super::term::{DogDay, DogDayPeriod, SolarTerm};
use crate::error::{PreceptError, PreceptResult};

/// 合成的农历月
#[derive(Debug, Clone, Copy)]
struct SyntheticMonth {
    year: i32,
    month: u8,
    start: NaiveDate,
    length: u8,
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 覆盖 2023-12-13 至 2025-01-28（农历2023年冬月至2024年腊月）
pub struct FakeProvider {
    months: Vec<SyntheticMonth>,
    terms: HashMap<NaiveDate, SolarTerm>,
    dog_days: Vec<(NaiveDate, DogDayPeriod, u8)>,
    solar_term_lookups: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        let mut months = vec![
            SyntheticMonth {
                year: 2023,
                month: 11,
                start: ymd(2023, 12, 13),
                length: 29,
            },
            SyntheticMonth {
                year: 2023,
                month: 12,
                start: ymd(2024, 1, 11),
                length: 30,
            },
        ];

        let lengths_2024: [u8; 12] = [29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30];
        let mut start = ymd(2024, 2, 10);
        for (i, &length) in lengths_2024.iter().enumerate() {
            months.push(SyntheticMonth {
                year: 2024,
                month: i as u8 + 1,
                start,
                length,
            });
            start += chrono::Duration::days(length as i64);
        }

        let terms = [
            (ymd(2023, 12, 22), SolarTerm::DongZhi),
            (ymd(2024, 2, 4), SolarTerm::LiChun),
            (ymd(2024, 3, 20), SolarTerm::ChunFen),
            (ymd(2024, 5, 5), SolarTerm::LiXia),
            (ymd(2024, 6, 21), SolarTerm::XiaZhi),
            (ymd(2024, 8, 7), SolarTerm::LiQiu),
            (ymd(2024, 9, 22), SolarTerm::QiuFen),
            (ymd(2024, 11, 7), SolarTerm::LiDong),
            (ymd(2024, 12, 21), SolarTerm::DongZhi),
            (ymd(2025, 2, 3), SolarTerm::LiChun),
        ]
        .into_iter()
        .collect();

        let dog_days = vec![
            (ymd(2024, 7, 15), DogDayPeriod::Chu, 10),
            (ymd(2024, 7, 25), DogDayPeriod::Zhong, 20),
            (ymd(2024, 8, 14), DogDayPeriod::Mo, 10),
        ];

        Self {
            months,
            terms,
            dog_days,
            solar_term_lookups: AtomicUsize::new(0),
        }
    }

    /// 累计的单日节气查询次数
    pub fn solar_term_lookups(&self) -> usize {
        self.solar_term_lookups.load(Ordering::SeqCst)
    }

    fn month_of(&self, date: NaiveDate) -> Option<&SyntheticMonth> {
        self.months.iter().find(|m| {
            let offset = (date - m.start).num_days();
            (0..m.length as i64).contains(&offset)
        })
    }
}

impl LunarDateProvider for FakeProvider {
    fn to_lunar(&self, date: NaiveDate) -> PreceptResult<LunarDate> {
        let month = self
            .month_of(date)
            .ok_or_else(|| PreceptError::out_of_range(date, "测试数据未覆盖"))?;
        let day = (date - month.start).num_days() as u8 + 1;
        Ok(LunarDate::new(month.year, month.month, day, false))
    }

    fn day_gan_zhi(&self, date: NaiveDate) -> PreceptResult<GanZhi> {
        // 2000-01-01 为戊午日（序号54）
        let index = (date.num_days_from_ce() as i64 + 14).rem_euclid(60);
        Ok(GanZhi::from_index(index as usize))
    }

    fn month_length(&self, lunar_year: i32, lunar_month: u8, _is_leap: bool) -> PreceptResult<u8> {
        self.months
            .iter()
            .find(|m| m.year == lunar_year && m.month == lunar_month)
            .map(|m| m.length)
            .ok_or_else(|| {
                PreceptError::out_of_range(ymd(lunar_year, 1, 1), format!("无农历{}月数据", lunar_month))
            })
    }

    fn solar_term_on_date(&self, date: NaiveDate) -> PreceptResult<Option<SolarTerm>> {
        self.solar_term_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.terms.get(&date).copied())
    }

    fn dog_day(&self, date: NaiveDate) -> PreceptResult<Option<DogDay>> {
        Ok(self.dog_days.iter().find_map(|&(start, period, length)| {
            let offset = (date - start).num_days();
            (0..length as i64).contains(&offset).then(|| DogDay {
                period,
                day: offset as u8 + 1,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_day_stems() {
        let fake = FakeProvider::new();
        assert_eq!(fake.day_gan_zhi(ymd(2000, 1, 1)).unwrap().to_string(), "戊午");
        assert_eq!(fake.day_gan_zhi(ymd(2000, 1, 7)).unwrap(), GanZhi::JIA_ZI);
        assert_eq!(fake.day_gan_zhi(ymd(2024, 2, 10)).unwrap().to_string(), "甲辰");
        assert_eq!(fake.day_gan_zhi(ymd(2024, 3, 1)).unwrap(), GanZhi::JIA_ZI);
    }

    #[test]
    fn test_synthetic_months() {
        let fake = FakeProvider::new();
        assert_eq!(fake.to_lunar(ymd(2024, 2, 10)).unwrap(), LunarDate::new(2024, 1, 1, false));
        assert_eq!(fake.to_lunar(ymd(2024, 3, 9)).unwrap(), LunarDate::new(2024, 1, 29, false));
        assert_eq!(fake.to_lunar(ymd(2024, 3, 10)).unwrap(), LunarDate::new(2024, 2, 1, false));
        assert_eq!(fake.to_lunar(ymd(2024, 11, 6)).unwrap(), LunarDate::new(2024, 10, 6, false));
        assert_eq!(fake.to_lunar(ymd(2025, 1, 28)).unwrap(), LunarDate::new(2024, 12, 30, false));
        assert!(fake.to_lunar(ymd(2025, 1, 29)).unwrap_err().is_recoverable());
        assert!(fake.to_lunar(ymd(2023, 12, 12)).is_err());
    }

    #[test]
    fn test_dog_days() {
        let fake = FakeProvider::new();
        let dog = fake.dog_day(ymd(2024, 7, 27)).unwrap().unwrap();
        assert_eq!(dog.period, DogDayPeriod::Zhong);
        assert_eq!(dog.day, 3);
        assert!(fake.dog_day(ymd(2024, 8, 24)).unwrap().is_none());
    }

    #[test]
    fn test_dog_days_outside_periods_are_none() {
        let fake = FakeProvider::new();
        // 初伏前一日（偏移 -1）
        assert!(fake.dog_day(ymd(2024, 7, 14)).unwrap().is_none());

        let hits = ymd(2023, 12, 13)
            .iter_days()
            .take_while(|d| *d <= ymd(2025, 1, 28))
            .filter(|d| fake.dog_day(*d).unwrap().is_some())
            .count();
        assert_eq!(hits, 40);
    }
}
