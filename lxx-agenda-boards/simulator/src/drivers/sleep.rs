use core::sync::atomic::{AtomicU32, Ordering};

use embassy_time::{Duration, Timer};
use lxx_agenda_common::*;

/// 已完成的唤醒周期数，跨周期保留（相当于 RTC 内存）
static COMPLETED_CYCLES: AtomicU32 = AtomicU32::new(0);

/// 按比例缩短的深度睡眠，达到周期数上限后停止模拟器
pub struct ScaledSleep {
    armed: Option<Duration>,
    scale: u64,
    max_cycles: u32,
    stop: fn(),
}

impl ScaledSleep {
    pub fn new(scale: u64, max_cycles: u32, stop: fn()) -> Self {
        Self {
            armed: None,
            scale: scale.max(1),
            max_cycles,
            stop,
        }
    }
}

impl DeepSleep for ScaledSleep {
    fn arm_wake_timer(&mut self, duration: Duration) {
        self.armed = Some(duration);
    }

    async fn enter_deep_sleep(&mut self) {
        let completed = COMPLETED_CYCLES.fetch_add(1, Ordering::Relaxed) + 1;
        if self.max_cycles != 0 && completed >= self.max_cycles {
            info!("[Simulator Sleep] {} wake cycles done", completed);
            (self.stop)();
            return;
        }

        let Some(armed) = self.armed else {
            // 没有唤醒源，真实硬件会一直睡下去
            warn!("[Simulator Sleep] No wake timer armed");
            (self.stop)();
            return;
        };
        let scaled = Duration::from_millis(armed.as_millis() / self.scale);
        info!(
            "[Simulator Sleep] Sleeping {}s (simulated {}s)",
            scaled.as_secs(),
            armed.as_secs()
        );
        Timer::after(scaled).await;
    }
}
