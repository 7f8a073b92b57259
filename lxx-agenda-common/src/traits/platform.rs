use embedded_hal_async::delay::DelayNs;

use crate::traits::{CredentialStore, DeepSleep, EpdPanel, PubSubClient, SntpClient, WifiController};

/// 一次唤醒所需的全部外设
pub struct PlatformContext<P: PlatformTrait> {
    pub wifi: P::Wifi,
    pub sntp: P::Sntp,
    pub credentials: P::Credentials,
    pub pubsub: P::PubSub,
    pub epd: P::Epd,
    pub sleep: P::Sleep,
    pub delay: P::Delay,
}

pub trait PlatformTrait: Sized {
    type Wifi: WifiController;
    type Sntp: SntpClient;
    type Credentials: CredentialStore;
    type PubSub: PubSubClient;
    type Epd: EpdPanel;
    type Sleep: DeepSleep;
    type Delay: DelayNs;

    /// 初始化外设。每次唤醒调用一次，不保留上个周期的状态
    async fn init() -> PlatformContext<Self>;

    /// 停机，不再进入下一个唤醒周期
    fn sys_stop();
}
