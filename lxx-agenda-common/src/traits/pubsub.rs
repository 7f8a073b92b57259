use crate::traits::Credentials;
use crate::types::MessageQueue;

/// 安全发布/订阅客户端（MQTT over TLS）
pub trait PubSubClient {
    type Error: core::fmt::Debug;

    async fn connect(
        &mut self,
        endpoint: &str,
        port: u16,
        client_id: &str,
        credentials: &Credentials,
    ) -> Result<(), Self::Error>;

    /// 订阅，收到确认后才返回
    async fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error>;

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error>;

    /// 处理套接字与保活，把到达的消息放入队列。
    /// 每个等待循环都必须周期性调用，否则消息会被延迟
    async fn service(&mut self, queue: &MessageQueue) -> Result<(), Self::Error>;

    fn is_connected(&self) -> bool;

    async fn disconnect(&mut self) -> Result<(), Self::Error>;
}
