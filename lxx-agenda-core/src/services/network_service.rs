use embedded_hal_async::delay::DelayNs;
use lxx_agenda_common::*;

/// 无线网络关联
///
/// 发起连接后按固定间隔轮询，次数用完仍未连上即失败。
/// 这是加载提示之前唯一的阶段，失败时不消耗全屏刷新。
pub struct NetworkService<'a> {
    config: &'a NetworkConfig,
    timing: &'a TimingConfig,
}

impl<'a> NetworkService<'a> {
    pub fn new(config: &'a NetworkConfig, timing: &'a TimingConfig) -> Self {
        Self { config, timing }
    }

    pub async fn associate<W, D>(
        &self,
        wifi: &mut W,
        delay: &mut D,
        state: &mut CycleState,
    ) -> SystemResult<()>
    where
        W: WifiController,
        D: DelayNs,
    {
        info!("Connecting to WiFi: {}", self.config.wifi_ssid);
        state.advance(ConnectivityState::Associating);

        if let Err(e) = wifi
            .begin_connect(&self.config.wifi_ssid, &self.config.wifi_password)
            .await
        {
            error!("WiFi connect request rejected: {:?}", e);
            return Err(SystemError::NetworkUnavailable);
        }

        let poll_ms = self.timing.associate_poll.as_millis() as u32;
        let mut attempts: u16 = 0;
        while !wifi.is_connected() && attempts < self.timing.associate_attempts {
            delay.delay_ms(poll_ms).await;
            attempts += 1;
        }

        if !wifi.is_connected() {
            state.wifi_ok = false;
            error!("WiFi connection failed after {} polls", attempts);
            return Err(SystemError::NetworkUnavailable);
        }

        state.wifi_ok = true;
        state.signal_quality = wifi.rssi();
        state.advance(ConnectivityState::Associated);
        info!(
            "WiFi connected after {} polls, RSSI {} dBm",
            attempts, state.signal_quality
        );
        Ok(())
    }
}
