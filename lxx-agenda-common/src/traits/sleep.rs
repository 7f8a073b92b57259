use embassy_time::Duration;

/// 深度睡眠与唤醒定时器
pub trait DeepSleep {
    fn arm_wake_timer(&mut self, duration: Duration);

    /// 进入深度睡眠。硬件上不会返回，唤醒后从复位开始；
    /// 模拟器睡眠结束后返回，由主循环开始下一个周期
    async fn enter_deep_sleep(&mut self);
}
