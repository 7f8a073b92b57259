use alloc::vec::Vec;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;

use crate::types::TopicString;

/// 消息队列深度，覆盖一个周期内最多的入站消息（影子响应、两路直发、增量）
pub const MESSAGE_QUEUE_DEPTH: usize = 8;

/// 单条消息的最大载荷，超出的消息由客户端丢弃
pub const MAX_PAYLOAD_SIZE: usize = 8192;

/// 从 MQTT 客户端收到的一条消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: TopicString,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return None;
        }
        Some(Self {
            topic: TopicString::try_from(topic).ok()?,
            payload: payload.to_vec(),
        })
    }
}

/// 入站消息队列
///
/// 客户端在 `service` 中写入，主流程在轮询循环里同步取出，
/// 单线程协作调度，不需要真正的锁。
pub type MessageQueue = Channel<NoopRawMutex, InboundMessage, MESSAGE_QUEUE_DEPTH>;
