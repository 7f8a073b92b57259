use embedded_hal_async::delay::DelayNs;
use jiff::Timestamp;
use lxx_agenda_common::*;

/// 墙上时间同步，TLS 证书有效期校验依赖它
pub struct TimeService<'a> {
    timing: &'a TimingConfig,
}

impl<'a> TimeService<'a> {
    pub fn new(timing: &'a TimingConfig) -> Self {
        Self { timing }
    }

    /// 返回同步后的 Unix 秒
    pub async fn sync<S, D>(&self, sntp: &mut S, delay: &mut D) -> SystemResult<i64>
    where
        S: SntpClient,
        D: DelayNs,
    {
        info!("Syncing time via SNTP");
        let interval_ms = self.timing.time_sync_interval.as_millis() as u32;
        let attempts = self.timing.time_sync_attempts;

        for attempt in 1..=attempts {
            match sntp.get_time().await {
                Ok(epoch) if epoch >= MIN_VALID_EPOCH => {
                    match Timestamp::from_second(epoch) {
                        Ok(ts) => info!("Time synchronized: {}", ts),
                        Err(_) => info!("Time synchronized: {}", epoch),
                    }
                    return Ok(epoch);
                }
                Ok(epoch) => debug!("Clock not set yet ({}), attempt {}/{}", epoch, attempt, attempts),
                Err(e) => warn!("SNTP request failed: {:?}, attempt {}/{}", e, attempt, attempts),
            }
            if attempt < attempts {
                delay.delay_ms(interval_ms).await;
            }
        }

        error!("Time sync failed after {} attempts", attempts);
        Err(SystemError::TimeSyncFailed)
    }
}
