//! 全局错误类型定义

use chrono::NaiveDate;
use rmp_serde::{decode::Error as MsgPackDecodeError, encode::Error as MsgPackEncodeError};
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreceptError {
    // 日期相关错误
    #[error("日期超出可换算范围：{date}（{reason}）")]
    DateOutOfRange { date: NaiveDate, reason: String },
    /// 干支循环在扫描窗口内必然重复，出现即为逻辑或数据缺陷
    #[error("干支日搜索失败：自 {anchor} 起 {window} 日内未找到第 {nth} 个匹配日")]
    CycleSearchExhausted {
        anchor: NaiveDate,
        nth: u32,
        window: u32,
    },

    // 规则相关错误
    #[error("戒期文本无法解析：{0}")]
    UnparseableRuleText(String),
    #[error("戒期规则表加载失败：{0}")]
    RuleTableError(String),

    // 历书相关错误
    #[error("历书加载失败：{0}")]
    AlmanacLoadError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("MessagePack序列化/反序列化失败：{0}")]
    MsgPackError(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

impl PreceptError {
    /// 构造日期越界错误
    pub fn out_of_range(date: NaiveDate, reason: impl Into<String>) -> Self {
        PreceptError::DateOutOfRange {
            date,
            reason: reason.into(),
        }
    }

    /// 非严格模式下可降级处理的错误（仅日期越界）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PreceptError::DateOutOfRange { .. })
    }
}

impl From<MsgPackDecodeError> for PreceptError {
    fn from(e: MsgPackDecodeError) -> Self {
        PreceptError::MsgPackError(format!("反序列化失败：{}", e))
    }
}

impl From<MsgPackEncodeError> for PreceptError {
    fn from(e: MsgPackEncodeError) -> Self {
        PreceptError::MsgPackError(format!("序列化失败：{}", e))
    }
}

// 全局Result类型
pub type PreceptResult<T> = Result<T, PreceptError>;
