use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use lxx_agenda_common::*;

/// 直接读取宿主机时钟
pub struct SystemClockSntp {
    /// 模拟时钟未同步：始终返回 0
    unsynced: bool,
}

impl SystemClockSntp {
    pub fn new(unsynced: bool) -> Self {
        Self { unsynced }
    }
}

impl SntpClient for SystemClockSntp {
    type Error = SystemTimeError;

    async fn get_time(&mut self) -> Result<i64, Self::Error> {
        if self.unsynced {
            return Ok(0);
        }
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        Ok(now.as_secs() as i64)
    }
}
