pub trait WifiController {
    type Error: core::fmt::Debug;

    /// 发起关联，立即返回；是否连上由 `is_connected` 轮询
    async fn begin_connect(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error>;

    fn is_connected(&self) -> bool;

    /// 当前信号强度（dBm）
    fn rssi(&self) -> i32;

    async fn disconnect(&mut self) -> Result<(), Self::Error>;
}
