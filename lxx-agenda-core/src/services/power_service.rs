use lxx_agenda_common::*;

/// 睡眠控制：每个周期的最后一步
///
/// 断开连接只尽力而为，失败记录后继续；随后设置唤醒定时器并进入深度睡眠。
pub struct PowerService<'a> {
    config: &'a PowerConfig,
}

impl<'a> PowerService<'a> {
    pub fn new(config: &'a PowerConfig) -> Self {
        Self { config }
    }

    pub async fn sleep<W, C, S>(&self, wifi: &mut W, client: &mut C, sleep: &mut S)
    where
        W: WifiController,
        C: PubSubClient,
        S: DeepSleep,
    {
        if client.is_connected() {
            match client.disconnect().await {
                Ok(()) => info!("MQTT disconnected"),
                Err(e) => warn!("MQTT disconnect failed: {:?}", e),
            }
        }
        // 关联失败时同样关闭射频
        match wifi.disconnect().await {
            Ok(()) => info!("WiFi disconnected"),
            Err(e) => warn!("WiFi disconnect failed: {:?}", e),
        }

        let duration = self.config.sleep_duration;
        info!("Entering deep sleep for {} minutes", duration.as_secs() / 60);
        sleep.arm_wake_timer(duration);
        sleep.enter_deep_sleep().await;
    }
}
