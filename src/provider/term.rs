//! 二十四节气与三伏

use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PreceptError;

/// 二十四节气（按公历年内先后排列，小寒居首）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SolarTerm {
    #[serde(rename = "小寒")]
    XiaoHan,
    #[serde(rename = "大寒")]
    DaHan,
    #[serde(rename = "立春")]
    LiChun,
    #[serde(rename = "雨水")]
    YuShui,
    #[serde(rename = "惊蛰")]
    JingZhe,
    #[serde(rename = "春分")]
    ChunFen,
    #[serde(rename = "清明")]
    QingMing,
    #[serde(rename = "谷雨")]
    GuYu,
    #[serde(rename = "立夏")]
    LiXia,
    #[serde(rename = "小满")]
    XiaoMan,
    #[serde(rename = "芒种")]
    MangZhong,
    #[serde(rename = "夏至")]
    XiaZhi,
    #[serde(rename = "小暑")]
    XiaoShu,
    #[serde(rename = "大暑")]
    DaShu,
    #[serde(rename = "立秋")]
    LiQiu,
    #[serde(rename = "处暑")]
    ChuShu,
    #[serde(rename = "白露")]
    BaiLu,
    #[serde(rename = "秋分")]
    QiuFen,
    #[serde(rename = "寒露")]
    HanLu,
    #[serde(rename = "霜降")]
    ShuangJiang,
    #[serde(rename = "立冬")]
    LiDong,
    #[serde(rename = "小雪")]
    XiaoXue,
    #[serde(rename = "大雪")]
    DaXue,
    #[serde(rename = "冬至")]
    DongZhi,
}

impl SolarTerm {
    pub const ALL: [SolarTerm; 24] = [
        SolarTerm::XiaoHan,
        SolarTerm::DaHan,
        SolarTerm::LiChun,
        SolarTerm::YuShui,
        SolarTerm::JingZhe,
        SolarTerm::ChunFen,
        SolarTerm::QingMing,
        SolarTerm::GuYu,
        SolarTerm::LiXia,
        SolarTerm::XiaoMan,
        SolarTerm::MangZhong,
        SolarTerm::XiaZhi,
        SolarTerm::XiaoShu,
        SolarTerm::DaShu,
        SolarTerm::LiQiu,
        SolarTerm::ChuShu,
        SolarTerm::BaiLu,
        SolarTerm::QiuFen,
        SolarTerm::HanLu,
        SolarTerm::ShuangJiang,
        SolarTerm::LiDong,
        SolarTerm::XiaoXue,
        SolarTerm::DaXue,
        SolarTerm::DongZhi,
    ];

    const NAMES: [&'static str; 24] = [
        "小寒", "大寒", "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至",
        "小暑", "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至",
    ];

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// 二分二至
    pub fn is_equinox_or_solstice(self) -> bool {
        matches!(
            self,
            SolarTerm::ChunFen | SolarTerm::QiuFen | SolarTerm::XiaZhi | SolarTerm::DongZhi
        )
    }

    /// 四立
    pub fn is_season_start(self) -> bool {
        matches!(
            self,
            SolarTerm::LiChun | SolarTerm::LiXia | SolarTerm::LiQiu | SolarTerm::LiDong
        )
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolarTerm {
    type Err = PreceptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|name| *name == s.trim())
            .map(|i| Self::ALL[i])
            .ok_or_else(|| PreceptError::InvalidInput(format!("未知节气：{}", s)))
    }
}

/// 某年某节气所在日期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarTermDay {
    pub term: SolarTerm,
    pub date: NaiveDate,
}

/// 三伏时段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DogDayPeriod {
    #[serde(rename = "初伏")]
    Chu,
    #[serde(rename = "中伏")]
    Zhong,
    #[serde(rename = "末伏")]
    Mo,
}

impl DogDayPeriod {
    pub fn name(self) -> &'static str {
        match self {
            DogDayPeriod::Chu => "初伏",
            DogDayPeriod::Zhong => "中伏",
            DogDayPeriod::Mo => "末伏",
        }
    }
}

/// 三伏中的某一日：时段 + 时段内序号（从1起）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogDay {
    pub period: DogDayPeriod,
    pub day: u8,
}

impl fmt::Display for DogDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}第{}天", self.period.name(), self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_terms() {
        let cardinal: Vec<&str> = SolarTerm::ALL
            .iter()
            .filter(|t| t.is_equinox_or_solstice() || t.is_season_start())
            .map(|t| t.name())
            .collect();
        assert_eq!(
            cardinal,
            vec!["立春", "春分", "立夏", "夏至", "立秋", "秋分", "立冬", "冬至"]
        );
    }

    #[test]
    fn test_name_parse_and_serde_agree() {
        for term in SolarTerm::ALL {
            assert_eq!(term.name().parse::<SolarTerm>().unwrap(), term);
            let json = serde_json::to_string(&term).unwrap();
            assert_eq!(json, format!("\"{}\"", term.name()));
        }
        assert!("春节".parse::<SolarTerm>().is_err());
    }

    #[test]
    fn test_dog_day_display() {
        let dog = DogDay {
            period: DogDayPeriod::Zhong,
            day: 7,
        };
        assert_eq!(dog.to_string(), "中伏第7天");
    }
}
