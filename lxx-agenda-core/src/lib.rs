#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod managers;
pub mod services;

use lxx_agenda_common::*;

pub use managers::{CycleOutcome, StateManager};

/// 执行一个完整的唤醒周期，最后一步总是进入睡眠
pub async fn run_cycle<P: PlatformTrait>(
    ctx: &mut PlatformContext<P>,
    config: &SystemConfig,
) -> CycleOutcome {
    StateManager::new(ctx, config).run().await
}

/// 主循环
///
/// 硬件上深度睡眠不会返回，唤醒即复位后重新进入这里；
/// 睡眠返回的平台（模拟器）在这里开始下一个周期，每个周期重新初始化外设。
pub async fn core_main<P: PlatformTrait>(config: SystemConfig) -> SystemResult<()> {
    info!("lxx-agenda starting...");

    let mut cycle: u32 = 0;
    loop {
        cycle = cycle.wrapping_add(1);
        info!("Wake cycle {} begins", cycle);

        let mut ctx = P::init().await;
        let outcome = run_cycle(&mut ctx, &config).await;

        match outcome.error {
            Some(e) => error!("Wake cycle {} failed at {:?}: {}", cycle, outcome.stage, e),
            None => info!(
                "Wake cycle {} complete (full refreshes: {}, partial refreshes: {})",
                cycle, outcome.full_refreshes, outcome.partial_refreshes
            ),
        }
    }
}
