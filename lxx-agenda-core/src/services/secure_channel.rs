//! 安全发布/订阅通道
//!
//! 凭据加载、连接、订阅、请求持久化状态与就绪通告。
//! 订阅必须全部确认后才能通告就绪，否则生产者的快速回复可能丢失。

use alloc::vec::Vec;

use lxx_agenda_common::*;
use serde::Serialize;

#[derive(Serialize)]
struct ReadyMessage<'a> {
    status: &'a str,
    timestamp: i64,
}

pub struct SecureChannel<'a> {
    config: &'a SystemConfig,
}

impl<'a> SecureChannel<'a> {
    pub fn new(config: &'a SystemConfig) -> Self {
        Self { config }
    }

    /// 三个凭据缺一不可，不存在部分凭据模式
    pub async fn load_credentials<S>(&self, store: &mut S) -> SystemResult<Credentials>
    where
        S: CredentialStore,
    {
        info!("Loading certificates");
        let credentials = Credentials {
            trust_anchor: load_one(store, CredentialKind::TrustAnchor).await?,
            device_certificate: load_one(store, CredentialKind::DeviceCertificate).await?,
            private_key: load_one(store, CredentialKind::PrivateKey).await?,
        };
        info!("Certificates loaded");
        Ok(credentials)
    }

    pub async fn connect<C>(
        &self,
        client: &mut C,
        credentials: &Credentials,
        state: &mut CycleState,
    ) -> SystemResult<()>
    where
        C: PubSubClient,
    {
        let network = &self.config.network_config;
        info!(
            "Connecting to MQTT broker {}:{} as {}",
            network.mqtt_endpoint, network.mqtt_port, network.thing_name
        );

        client
            .connect(
                &network.mqtt_endpoint,
                network.mqtt_port,
                &network.thing_name,
                credentials,
            )
            .await
            .map_err(|e| {
                error!("MQTT connect failed: {:?}", e);
                SystemError::SecureConnectFailed
            })?;

        state.advance(ConnectivityState::SecureChannelUp);
        info!("MQTT connected");
        Ok(())
    }

    /// 影子与直发主题全部订阅，不做条件选择
    pub async fn subscribe<C>(&self, client: &mut C, state: &mut CycleState) -> SystemResult<()>
    where
        C: PubSubClient,
    {
        for topic in self.config.topic_config.subscriptions() {
            client.subscribe(topic).await.map_err(|e| {
                error!("Subscribe to {} failed: {:?}", topic, e);
                SystemError::SubscribeFailed
            })?;
            info!("Subscribed to: {}", topic);
        }

        state.advance(ConnectivityState::Subscribed);
        Ok(())
    }

    /// 请求影子文档，回复经 get/accepted 主题到达。失败只告警
    pub async fn request_persisted_state<C>(&self, client: &mut C)
    where
        C: PubSubClient,
    {
        let topic = &self.config.topic_config.shadow_get;
        match client.publish(topic, b"").await {
            Ok(()) => info!("Requested shadow state"),
            Err(e) => warn!("Shadow get request failed: {:?}", e),
        }
    }

    /// 就绪通告触发生产者立即抓取并发布。失败只告警
    pub async fn announce_ready<C>(&self, client: &mut C, epoch: i64)
    where
        C: PubSubClient,
    {
        let message = ReadyMessage {
            status: "ready",
            timestamp: epoch,
        };
        let payload = match serde_json::to_vec(&message) {
            Ok(payload) => payload,
            Err(_) => {
                warn!("Failed to encode ready message");
                return;
            }
        };

        let topic = &self.config.topic_config.status;
        match client.publish(topic, &payload).await {
            Ok(()) => info!("Published ready status to {}", topic),
            Err(e) => warn!("Ready status publish failed: {:?}", e),
        }
    }
}

async fn load_one<S: CredentialStore>(store: &mut S, kind: CredentialKind) -> SystemResult<Vec<u8>> {
    match store.load(kind).await {
        Ok(bytes) if !bytes.is_empty() => {
            debug!("Loaded {} ({} bytes)", kind, bytes.len());
            Ok(bytes)
        }
        Ok(_) => {
            error!("Empty {}: {}", kind, kind.file_name());
            Err(SystemError::CredentialMissing(kind))
        }
        Err(e) => {
            error!("Failed to read {} from {}: {:?}", kind, kind.file_name(), e);
            Err(SystemError::CredentialMissing(kind))
        }
    }
}
