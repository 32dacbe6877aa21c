//! 第N个干支日搜索
//! 自锚点次日起逐日前推，找到第N个满足条件的日干支；六十甲子必在窗口内循环，搜索失败即视为缺陷

use chrono::{Days, NaiveDate};

use crate::error::{PreceptError, PreceptResult};
use crate::provider::{GanZhi, LunarDateProvider};

/// 锚点之后（不含锚点）第 `nth` 个满足 `predicate` 的日期
pub fn nth_matching_day_after<F>(
    provider: &dyn LunarDateProvider,
    anchor: NaiveDate,
    nth: u32,
    window: u32,
    predicate: F,
) -> PreceptResult<NaiveDate>
where
    F: Fn(GanZhi) -> bool,
{
    if nth == 0 {
        return Err(PreceptError::InvalidInput("搜索序号必须从1开始".to_string()));
    }

    let mut found = 0u32;
    for offset in 1..=u64::from(window) {
        let date = anchor
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| PreceptError::out_of_range(anchor, "日期超出公历表示范围"))?;
        if predicate(provider.day_gan_zhi(date)?) {
            found += 1;
            if found == nth {
                return Ok(date);
            }
        }
    }

    Err(PreceptError::CycleSearchExhausted { anchor, nth, window })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fake::{FakeProvider, ymd};
    use crate::provider::{EarthlyBranch, HeavenlyStem};

    #[test]
    fn test_anchor_day_excluded() {
        let fake = FakeProvider::new();
        // 2024-03-01 为甲子日，从当天起算时不应计入
        let anchor = ymd(2024, 3, 1);
        let next = nth_matching_day_after(&fake, anchor, 1, 120, |gz| gz == GanZhi::JIA_ZI).unwrap();
        assert_eq!(next, ymd(2024, 4, 30));
    }

    #[test]
    fn test_third_xu_day_after_winter_solstice() {
        let fake = FakeProvider::new();
        let found = nth_matching_day_after(&fake, ymd(2023, 12, 22), 3, 120, |gz| {
            gz.branch == EarthlyBranch::Xu
        })
        .unwrap();
        assert_eq!(found, ymd(2024, 1, 23));
    }

    #[test]
    fn test_fifth_wu_stem_after_spring_start() {
        let fake = FakeProvider::new();
        let found = nth_matching_day_after(&fake, ymd(2024, 2, 4), 5, 120, |gz| {
            gz.stem == HeavenlyStem::Wu
        })
        .unwrap();
        assert_eq!(found, ymd(2024, 3, 25));
    }

    #[test]
    fn test_exhausted_window_is_fatal() {
        let fake = FakeProvider::new();
        let err = nth_matching_day_after(&fake, ymd(2024, 3, 1), 3, 20, |gz| {
            gz.branch == EarthlyBranch::Xu
        })
        .unwrap_err();
        assert!(matches!(
            err,
            PreceptError::CycleSearchExhausted { nth: 3, window: 20, .. }
        ));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_zero_nth_rejected() {
        let fake = FakeProvider::new();
        let err = nth_matching_day_after(&fake, ymd(2024, 3, 1), 0, 120, |_| true).unwrap_err();
        assert!(matches!(err, PreceptError::InvalidInput(_)));
    }
}
