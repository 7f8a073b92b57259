//! 日程文档
//!
//! `{"events":[{"title":..,"time":..,"description":..,"multiday":..}, ..]}`，
//! 直发主题与影子文档 `desired.calendar` 使用同一结构。

use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use crate::types::DocumentError;

/// 最多显示的日程条数，多余条目直接丢弃
pub const MAX_SCHEDULE_ENTRIES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "time", default)]
    pub time_label: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "multiday", default)]
    pub is_multiday: bool,
}

#[derive(Deserialize)]
struct RawScheduleDocument {
    /// 必须存在，缺少时整个文档视为无法解析
    events: Vec<ScheduleEntry>,
}

/// 解析后的日程，按到达顺序保留前 `MAX_SCHEDULE_ENTRIES` 条
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleDocument {
    pub entries: heapless::Vec<ScheduleEntry, MAX_SCHEDULE_ENTRIES>,
    /// 源文档中的条目总数（截断前）
    pub total: usize,
}

impl ScheduleDocument {
    pub fn parse(payload: &[u8]) -> Result<Self, DocumentError> {
        let text = core::str::from_utf8(payload).map_err(|_| DocumentError::NotUtf8)?;
        let raw: RawScheduleDocument =
            serde_json::from_str(text).map_err(|_| DocumentError::Malformed)?;

        let total = raw.events.len();
        let mut entries = heapless::Vec::new();
        for entry in raw.events.into_iter().take(MAX_SCHEDULE_ENTRIES) {
            // take() 保证不会超出容量
            let _ = entries.push(entry);
        }

        Ok(Self { entries, total })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 被丢弃的条目数
    pub fn dropped(&self) -> usize {
        self.total - self.entries.len()
    }
}
