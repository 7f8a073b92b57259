mod broker;
mod credentials;
mod epd;
mod sleep;
mod sntp;
mod wifi;

pub use broker::LoopbackBroker;
pub use credentials::FileCredentialStore;
pub use epd::PngPanel;
pub use sleep::ScaledSleep;
pub use sntp::SystemClockSntp;
pub use wifi::SimulatedWifi;

use std::path::PathBuf;
use std::str::FromStr;

/// 读取 `SIM_*` 环境变量，缺省或无法解析时使用默认值
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// 模拟数据目录：证书与生产者数据
pub fn data_dir() -> PathBuf {
    std::env::var("SIM_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")))
}
