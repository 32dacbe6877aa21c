//! 农历数据源模块
//! 定义农历能力接口、干支/节气类型，以及记忆化包装与历书数据源

pub mod almanac;
pub mod cache;
pub mod ganzhi;
pub mod lunar;
pub mod memo;
pub mod term;

#[cfg(test)]
pub(crate) mod fake;

pub use self::almanac::{AlmanacData, AlmanacDay, AlmanacMonth, AlmanacProvider};
pub use self::cache::{AlmanacCache, AlmanacLoader};
pub use self::ganzhi::{EarthlyBranch, GanZhi, HeavenlyStem};
pub use self::lunar::{CalendarDate, LunarDate, LunarDateProvider};
pub use self::memo::MemoizedProvider;
pub use self::term::{DogDay, DogDayPeriod, SolarTerm, SolarTermDay};
