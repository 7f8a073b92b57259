//! 单个唤醒周期的状态
//!
//! 每次唤醒重新构造，周期结束随上下文一起丢弃，不跨睡眠保存。

use alloc::string::String;

use embassy_time::Duration;

/// 连接状态，一个周期内只前进不后退
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ConnectivityState {
    #[default]
    Disconnected,
    Associating,
    Associated,
    SecureChannelUp,
    Subscribed,
}

/// 启动状态机的阶段，顺序即执行顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CycleStage {
    NetworkAssociate,
    DisplayLoadingIndicator,
    CertificateLoad,
    TimeSync,
    SecureConnect,
    Subscribe,
    RequestPersistedState,
    AnnounceReady,
    AwaitData,
    Render,
    Sleep,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CycleState {
    pub connectivity: ConnectivityState,
    pub wifi_ok: bool,
    pub schedule_received: bool,
    pub weather_received: bool,
    pub schedule_payload: String,
    pub weather_payload: String,
    /// RSSI（dBm），未连接时为 0
    pub signal_quality: i32,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 推进连接状态，较早的状态被忽略
    pub fn advance(&mut self, state: ConnectivityState) {
        if state > self.connectivity {
            self.connectivity = state;
        }
    }

    /// 两种投递方式写同一字段，后到的覆盖先到的
    pub fn store_schedule(&mut self, payload: String) {
        self.schedule_payload = payload;
        self.schedule_received = true;
    }

    pub fn store_weather(&mut self, payload: String) {
        self.weather_payload = payload;
        self.weather_received = true;
    }

    pub fn both_received(&self) -> bool {
        self.schedule_received && self.weather_received
    }
}

/// 等待数据的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalReport {
    pub schedule: bool,
    pub weather: bool,
    /// 等待累计时长（各次轮询间隔之和）
    pub elapsed: Duration,
}

impl ArrivalReport {
    pub fn is_complete(&self) -> bool {
        self.schedule && self.weather
    }

    /// 只收到一路：降级显示，不是错误
    pub fn is_partial(&self) -> bool {
        self.schedule != self.weather
    }

    pub fn is_empty(&self) -> bool {
        !self.schedule && !self.weather
    }
}
