//! 回环代理
//!
//! 同时扮演 MQTT 代理和两个数据生产者：设备发布就绪消息后，
//! 经过 `producer_delay` 把数据目录里的日程与天气文档发到直发主题；
//! 影子查询由 `shadow.json` 应答，文件不存在时不应答。

use std::path::PathBuf;

use embassy_time::{Duration, Instant};
use lxx_agenda_common::*;

#[derive(Debug)]
pub enum BrokerError {
    Refused,
    BadCredentials,
    NotConnected,
}

struct Pending {
    due: Instant,
    topic: String,
    payload: Vec<u8>,
}

pub struct LoopbackBroker {
    topics: TopicConfig,
    data_dir: PathBuf,
    producer_delay: Duration,
    refuse: bool,
    connected: bool,
    subscriptions: Vec<String>,
    pending: Vec<Pending>,
}

impl LoopbackBroker {
    pub fn new(topics: TopicConfig, data_dir: PathBuf, producer_delay: Duration, refuse: bool) -> Self {
        Self {
            topics,
            data_dir,
            producer_delay,
            refuse,
            connected: false,
            subscriptions: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn schedule_file(&mut self, file: &str, topic: &str, due: Instant) {
        match std::fs::read(self.data_dir.join(file)) {
            Ok(payload) => self.pending.push(Pending {
                due,
                topic: topic.to_string(),
                payload,
            }),
            Err(e) => info!("[Simulator Broker] No producer data in {}: {}", file, e),
        }
    }
}

fn looks_like_pem(blob: &[u8]) -> bool {
    blob.starts_with(b"-----BEGIN")
}

impl PubSubClient for LoopbackBroker {
    type Error = BrokerError;

    async fn connect(
        &mut self,
        endpoint: &str,
        port: u16,
        client_id: &str,
        credentials: &Credentials,
    ) -> Result<(), Self::Error> {
        info!(
            "[Simulator Broker] {} connecting to {}:{} ({:?})",
            client_id, endpoint, port, credentials
        );
        if self.refuse {
            return Err(BrokerError::Refused);
        }
        let all_pem = CredentialKind::ALL
            .iter()
            .all(|kind| looks_like_pem(credentials.get(*kind)));
        if !all_pem {
            return Err(BrokerError::BadCredentials);
        }
        self.connected = true;
        Ok(())
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(BrokerError::NotConnected);
        }
        debug!("[Simulator Broker] SUBACK {}", topic);
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(BrokerError::NotConnected);
        }
        info!(
            "[Simulator Broker] PUBLISH {}: {}",
            topic,
            String::from_utf8_lossy(payload)
        );

        if topic == self.topics.status.as_str() {
            let due = Instant::now() + self.producer_delay;
            let schedule = self.topics.schedule.clone();
            let weather = self.topics.weather.clone();
            self.schedule_file("calendar.json", &schedule, due);
            self.schedule_file("weather.json", &weather, due);
        } else if topic == self.topics.shadow_get.as_str() {
            let accepted = self.topics.shadow_get_accepted.clone();
            self.schedule_file("shadow.json", &accepted, Instant::now());
        }
        Ok(())
    }

    async fn service(&mut self, queue: &MessageQueue) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(BrokerError::NotConnected);
        }
        let now = Instant::now();
        let mut index = 0;
        while index < self.pending.len() {
            let message = &self.pending[index];
            if message.due > now {
                index += 1;
                continue;
            }
            if !self.subscriptions.iter().any(|t| *t == message.topic) {
                debug!("[Simulator Broker] No subscriber for {}", message.topic);
                self.pending.remove(index);
                continue;
            }
            let Some(inbound) = InboundMessage::new(&message.topic, &message.payload) else {
                warn!(
                    "[Simulator Broker] Dropping oversized message on {}",
                    message.topic
                );
                self.pending.remove(index);
                continue;
            };
            if queue.try_send(inbound).is_err() {
                // 队列满，留到下一次 service
                break;
            }
            self.pending.remove(index);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        info!("[Simulator Broker] Disconnected");
        self.connected = false;
        self.subscriptions.clear();
        self.pending.clear();
        Ok(())
    }
}
