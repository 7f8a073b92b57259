//! 数据到达同步
//!
//! 日程与天气两路数据独立到达，可能来自影子文档，也可能来自直发主题，
//! 两种途径写同一组字段，同一周期内后到的覆盖先到的。
//! 每次轮询先让客户端处理套接字，再同步取空消息队列。

use alloc::string::{String, ToString};

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use lxx_agenda_common::*;
use serde_json::Value;

/// 一条消息带来的数据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivered {
    pub schedule: bool,
    pub weather: bool,
}

pub struct ArrivalSynchronizer<'a> {
    topics: &'a TopicConfig,
    timing: &'a TimingConfig,
}

impl<'a> ArrivalSynchronizer<'a> {
    pub fn new(topics: &'a TopicConfig, timing: &'a TimingConfig) -> Self {
        Self { topics, timing }
    }

    /// 按主题分发一条消息
    pub fn dispatch(&self, message: &InboundMessage, state: &mut CycleState) -> Delivered {
        let topic = message.topic.as_str();
        let mut delivered = Delivered::default();

        if topic == self.topics.schedule.as_str() {
            info!("Calendar data received ({} bytes)", message.payload.len());
            state.store_schedule(payload_text(&message.payload));
            delivered.schedule = true;
        } else if topic == self.topics.weather.as_str() {
            info!("Weather data received ({} bytes)", message.payload.len());
            state.store_weather(payload_text(&message.payload));
            delivered.weather = true;
        } else if topic == self.topics.shadow_delta.as_str()
            || topic == self.topics.shadow_get_accepted.as_str()
        {
            delivered = dispatch_shadow(&message.payload, state);
            info!(
                "Shadow document on {} (calendar: {}, weather: {})",
                topic, delivered.schedule, delivered.weather
            );
        } else {
            debug!("Ignoring message on {}", topic);
        }

        delivered
    }

    /// 处理客户端并取空队列
    pub async fn pump<C>(&self, client: &mut C, queue: &MessageQueue, state: &mut CycleState)
    where
        C: PubSubClient,
    {
        if let Err(e) = client.service(queue).await {
            warn!("MQTT service error: {:?}", e);
        }
        while let Ok(message) = queue.try_receive() {
            self.dispatch(&message, state);
        }
    }

    /// 订阅后的短暂等待，期间持续处理客户端
    pub async fn settle<C, D>(
        &self,
        client: &mut C,
        delay: &mut D,
        queue: &MessageQueue,
        state: &mut CycleState,
    ) where
        C: PubSubClient,
        D: DelayNs,
    {
        let poll = self.timing.data_poll.as_millis().max(1);
        let mut remaining = self.timing.subscribe_settle.as_millis();
        while remaining > 0 {
            self.pump(client, queue, state).await;
            let step = poll.min(remaining);
            delay.delay_ms(step as u32).await;
            remaining -= step;
        }
        self.pump(client, queue, state).await;
    }

    /// 等待两路数据，全部到达立即返回，否则在超时边界返回
    ///
    /// 经过的时间按轮询间隔累加，不读取时钟。
    pub async fn await_both<C, D>(
        &self,
        client: &mut C,
        delay: &mut D,
        queue: &MessageQueue,
        state: &mut CycleState,
    ) -> ArrivalReport
    where
        C: PubSubClient,
        D: DelayNs,
    {
        let timeout = self.timing.data_timeout.as_millis();
        let poll = self.timing.data_poll.as_millis().max(1);
        let progress = self.timing.progress_interval.as_millis().max(poll);

        info!(
            "Waiting up to {}s for calendar and weather data",
            self.timing.data_timeout.as_secs()
        );

        let mut elapsed: u64 = 0;
        let mut next_progress = progress;
        loop {
            self.pump(client, queue, state).await;
            if state.both_received() || elapsed >= timeout {
                break;
            }

            let step = poll.min(timeout - elapsed);
            delay.delay_ms(step as u32).await;
            elapsed += step;

            if elapsed >= next_progress {
                info!(
                    "Waiting for data... {}s (calendar: {}, weather: {})",
                    elapsed / 1000,
                    state.schedule_received,
                    state.weather_received
                );
                next_progress += progress;
            }
        }

        let report = ArrivalReport {
            schedule: state.schedule_received,
            weather: state.weather_received,
            elapsed: Duration::from_millis(elapsed),
        };
        if report.is_complete() {
            info!("All data received after {} ms", elapsed);
        } else {
            warn!(
                "Data wait ended after {} ms (calendar: {}, weather: {})",
                elapsed, report.schedule, report.weather
            );
        }
        report
    }
}

fn payload_text(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).into_owned()
}

/// `{"state":{"desired":{"weather":{..},"calendar":{..}}}}`，两个字段各自可缺省
fn dispatch_shadow(payload: &[u8], state: &mut CycleState) -> Delivered {
    let mut delivered = Delivered::default();

    let document: Value = match serde_json::from_slice(payload) {
        Ok(document) => document,
        Err(_) => {
            warn!("Shadow document is not valid JSON ({} bytes)", payload.len());
            return delivered;
        }
    };

    let Some(shadow_state) = document.get("state") else {
        return delivered;
    };
    // 标准 delta 消息省略 desired 层
    let desired = shadow_state.get("desired").unwrap_or(shadow_state);

    if let Some(weather) = present(desired, "weather") {
        state.store_weather(weather.to_string());
        delivered.weather = true;
    }
    if let Some(calendar) = present(desired, "calendar") {
        state.store_schedule(calendar.to_string());
        delivered.schedule = true;
    }
    delivered
}

/// `null` 表示生产者清空了该字段，等同于缺省
fn present<'a>(desired: &'a Value, name: &str) -> Option<&'a Value> {
    desired.get(name).filter(|v| !v.is_null())
}
