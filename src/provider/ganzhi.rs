//! 天干地支与六十甲子
//! 干支以中文双字（如"甲子"）序列化，便于历书文件直接书写

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::PreceptError;

/// 十天干
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeavenlyStem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl HeavenlyStem {
    pub const ALL: [HeavenlyStem; 10] = [
        HeavenlyStem::Jia,
        HeavenlyStem::Yi,
        HeavenlyStem::Bing,
        HeavenlyStem::Ding,
        HeavenlyStem::Wu,
        HeavenlyStem::Ji,
        HeavenlyStem::Geng,
        HeavenlyStem::Xin,
        HeavenlyStem::Ren,
        HeavenlyStem::Gui,
    ];

    const CHARS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 10]
    }

    pub fn as_char(self) -> char {
        Self::CHARS[self.index()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::CHARS.iter().position(|&s| s == c).map(Self::from_index)
    }
}

/// 十二地支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EarthlyBranch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl EarthlyBranch {
    pub const ALL: [EarthlyBranch; 12] = [
        EarthlyBranch::Zi,
        EarthlyBranch::Chou,
        EarthlyBranch::Yin,
        EarthlyBranch::Mao,
        EarthlyBranch::Chen,
        EarthlyBranch::Si,
        EarthlyBranch::Wu,
        EarthlyBranch::Wei,
        EarthlyBranch::Shen,
        EarthlyBranch::You,
        EarthlyBranch::Xu,
        EarthlyBranch::Hai,
    ];

    const CHARS: [char; 12] = ['子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥'];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn as_char(self) -> char {
        Self::CHARS[self.index()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::CHARS.iter().position(|&b| b == c).map(Self::from_index)
    }
}

/// 干支组合（六十甲子之一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GanZhi {
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
}

impl GanZhi {
    pub const JIA_ZI: GanZhi = GanZhi {
        stem: HeavenlyStem::Jia,
        branch: EarthlyBranch::Zi,
    };
    pub const GENG_SHEN: GanZhi = GanZhi {
        stem: HeavenlyStem::Geng,
        branch: EarthlyBranch::Shen,
    };

    /// 组合干支；阴阳不配（如"甲丑"）时返回None
    pub fn new(stem: HeavenlyStem, branch: EarthlyBranch) -> Option<Self> {
        (stem.index() % 2 == branch.index() % 2).then_some(Self { stem, branch })
    }

    /// 由六十甲子序号构建（0 = 甲子）
    pub fn from_index(index: usize) -> Self {
        Self {
            stem: HeavenlyStem::from_index(index % 60),
            branch: EarthlyBranch::from_index(index % 60),
        }
    }

    /// 六十甲子序号（0 = 甲子，59 = 癸亥）
    pub fn index(&self) -> usize {
        let s = self.stem.index() as i64;
        let b = self.branch.index() as i64;
        (6 * s - 5 * b).rem_euclid(60) as usize
    }
}

impl fmt::Display for GanZhi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem.as_char(), self.branch.as_char())
    }
}

impl FromStr for GanZhi {
    type Err = PreceptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(stem_char), Some(branch_char), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(PreceptError::InvalidInput(format!("干支格式错误：{}", s)));
        };

        let stem = HeavenlyStem::from_char(stem_char)
            .ok_or_else(|| PreceptError::InvalidInput(format!("未知天干：{}", stem_char)))?;
        let branch = EarthlyBranch::from_char(branch_char)
            .ok_or_else(|| PreceptError::InvalidInput(format!("未知地支：{}", branch_char)))?;

        GanZhi::new(stem, branch)
            .ok_or_else(|| PreceptError::InvalidInput(format!("干支阴阳不配：{}", s)))
    }
}

impl TryFrom<String> for GanZhi {
    type Error = PreceptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GanZhi> for String {
    fn from(value: GanZhi) -> Self {
        value.to_string()
    }
}
