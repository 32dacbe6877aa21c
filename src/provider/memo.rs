//! 按年记忆化的节气查询
//! 节气表只追加不修改；并发首次计算时允许重复计算，以先写入者为准

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use chrono::NaiveDate;
use tracing::debug;

use super::ganzhi::GanZhi;
use super::lunar::{LunarDate, LunarDateProvider};
use super::term::{DogDay, SolarTerm, SolarTermDay};
use crate::error::PreceptResult;

/// 记忆化包装：除 solar_terms_of_year 外全部透传
pub struct MemoizedProvider {
    inner: Arc<dyn LunarDateProvider>,
    solar_terms: RwLock<HashMap<i32, Arc<[SolarTermDay]>>>,
}

impl MemoizedProvider {
    pub fn new(inner: Arc<dyn LunarDateProvider>) -> Self {
        Self {
            inner,
            solar_terms: RwLock::new(HashMap::new()),
        }
    }

    /// 预先填充指定年份（启动期一次性加载）
    pub fn preload(&self, years: impl IntoIterator<Item = i32>) -> PreceptResult<()> {
        for year in years {
            self.solar_terms_of_year(year)?;
        }
        Ok(())
    }

    /// 已缓存的年份数
    pub fn cached_years(&self) -> usize {
        self.solar_terms
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn cached(&self, year: i32) -> Option<Arc<[SolarTermDay]>> {
        // 缓存只追加完整条目，锁中毒时已写入的数据仍然有效
        let cache = self.solar_terms.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.get(&year).cloned()
    }
}

impl LunarDateProvider for MemoizedProvider {
    fn to_lunar(&self, date: NaiveDate) -> PreceptResult<LunarDate> {
        self.inner.to_lunar(date)
    }

    fn day_gan_zhi(&self, date: NaiveDate) -> PreceptResult<GanZhi> {
        self.inner.day_gan_zhi(date)
    }

    fn month_length(&self, lunar_year: i32, lunar_month: u8, is_leap: bool) -> PreceptResult<u8> {
        self.inner.month_length(lunar_year, lunar_month, is_leap)
    }

    fn solar_term_on_date(&self, date: NaiveDate) -> PreceptResult<Option<SolarTerm>> {
        self.inner.solar_term_on_date(date)
    }

    fn dog_day(&self, date: NaiveDate) -> PreceptResult<Option<DogDay>> {
        self.inner.dog_day(date)
    }

    fn solar_terms_of_year(&self, year: i32) -> PreceptResult<Arc<[SolarTermDay]>> {
        if let Some(terms) = self.cached(year) {
            return Ok(terms);
        }

        // 锁外计算，避免长时间持有写锁
        let computed = self.inner.solar_terms_of_year(year)?;

        let mut cache = self.solar_terms.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let terms = cache.entry(year).or_insert_with(|| {
            debug!("节气表已缓存：{}年，共{}个节气", year, computed.len());
            computed
        });
        Ok(Arc::clone(terms))
    }
}
