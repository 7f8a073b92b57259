use core::convert::Infallible;

use embassy_time::{Duration, Instant};
use lxx_agenda_common::*;

/// 固定延迟后“关联成功”的 WiFi
pub struct SimulatedWifi {
    connect_delay: Duration,
    rssi: i32,
    fail: bool,
    connected_at: Option<Instant>,
}

impl SimulatedWifi {
    pub fn new(connect_delay: Duration, rssi: i32, fail: bool) -> Self {
        Self {
            connect_delay,
            rssi,
            fail,
            connected_at: None,
        }
    }
}

impl WifiController for SimulatedWifi {
    type Error = Infallible;

    async fn begin_connect(&mut self, ssid: &str, _password: &str) -> Result<(), Self::Error> {
        if self.fail {
            warn!("[Simulator WiFi] Access point {} not reachable", ssid);
            self.connected_at = None;
        } else {
            info!("[Simulator WiFi] Associating with {}", ssid);
            self.connected_at = Some(Instant::now() + self.connect_delay);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected_at.is_some_and(|at| Instant::now() >= at)
    }

    fn rssi(&self) -> i32 {
        self.rssi
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        info!("[Simulator WiFi] Disconnected");
        self.connected_at = None;
        Ok(())
    }
}
