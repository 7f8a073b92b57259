//! 启动状态机
//!
//! 阶段严格按顺序执行，任一阶段失败都直接转到失败显示再睡眠，
//! 周期内不重试，恢复推迟到下一次唤醒。

use lxx_agenda_common::*;

use crate::services::{
    ArrivalSynchronizer, DisplayService, NetworkService, PowerService, SecureChannel, TimeService,
};

/// 一个周期的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    /// 失败时为失败的阶段，成功时为 `Sleep`
    pub stage: CycleStage,
    pub error: Option<SystemError>,
    pub arrival: Option<ArrivalReport>,
    pub connectivity: ConnectivityState,
    pub full_refreshes: u32,
    pub partial_refreshes: u32,
}

pub struct StateManager<'a, P: PlatformTrait> {
    ctx: &'a mut PlatformContext<P>,
    config: &'a SystemConfig,
    state: CycleState,
    queue: MessageQueue,
    display: DisplayService,
    stage: CycleStage,
    arrival: Option<ArrivalReport>,
}

impl<'a, P: PlatformTrait> StateManager<'a, P> {
    pub fn new(ctx: &'a mut PlatformContext<P>, config: &'a SystemConfig) -> Self {
        Self {
            ctx,
            config,
            state: CycleState::new(),
            queue: MessageQueue::new(),
            display: DisplayService::new(),
            stage: CycleStage::NetworkAssociate,
            arrival: None,
        }
    }

    fn enter(&mut self, stage: CycleStage) {
        debug!("Stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// 执行整个周期，包括失败显示与睡眠
    pub async fn run(mut self) -> CycleOutcome {
        let error = self.bootstrap().await.err();
        let failed_stage = self.stage;

        if let Some(e) = &error {
            error!("Stage {:?} failed: {}", failed_stage, e);
            self.display
                .report_failure(&mut self.ctx.epd, e, self.state.signal_quality)
                .await;
        }

        self.display.hibernate(&mut self.ctx.epd).await;

        let outcome = CycleOutcome {
            stage: if error.is_some() {
                failed_stage
            } else {
                CycleStage::Sleep
            },
            error,
            arrival: self.arrival,
            connectivity: self.state.connectivity,
            full_refreshes: self.display.full_refreshes(),
            partial_refreshes: self.display.partial_refreshes(),
        };

        self.enter(CycleStage::Sleep);
        PowerService::new(&self.config.power_config)
            .sleep(&mut self.ctx.wifi, &mut self.ctx.pubsub, &mut self.ctx.sleep)
            .await;

        outcome
    }

    async fn bootstrap(&mut self) -> SystemResult<()> {
        let config = self.config;
        let timing = &config.timing_config;

        self.enter(CycleStage::NetworkAssociate);
        config.validate()?;
        NetworkService::new(&config.network_config, timing)
            .associate(&mut self.ctx.wifi, &mut self.ctx.delay, &mut self.state)
            .await?;

        // 网络确认可用后才消耗一次全屏刷新
        self.enter(CycleStage::DisplayLoadingIndicator);
        self.display
            .show_loading(&mut self.ctx.epd, self.state.signal_quality)
            .await?;

        let channel = SecureChannel::new(config);

        self.enter(CycleStage::CertificateLoad);
        let credentials = channel.load_credentials(&mut self.ctx.credentials).await?;

        self.enter(CycleStage::TimeSync);
        let now = TimeService::new(timing)
            .sync(&mut self.ctx.sntp, &mut self.ctx.delay)
            .await?;

        self.enter(CycleStage::SecureConnect);
        channel
            .connect(&mut self.ctx.pubsub, &credentials, &mut self.state)
            .await?;
        drop(credentials);

        let sync = ArrivalSynchronizer::new(&config.topic_config, timing);

        self.enter(CycleStage::Subscribe);
        channel.subscribe(&mut self.ctx.pubsub, &mut self.state).await?;
        sync.settle(
            &mut self.ctx.pubsub,
            &mut self.ctx.delay,
            &self.queue,
            &mut self.state,
        )
        .await;

        self.enter(CycleStage::RequestPersistedState);
        channel.request_persisted_state(&mut self.ctx.pubsub).await;

        self.enter(CycleStage::AnnounceReady);
        channel.announce_ready(&mut self.ctx.pubsub, now).await;

        self.enter(CycleStage::AwaitData);
        let report = sync
            .await_both(
                &mut self.ctx.pubsub,
                &mut self.ctx.delay,
                &self.queue,
                &mut self.state,
            )
            .await;
        self.arrival = Some(report);

        if report.is_empty() {
            return Err(SystemError::DataTimeout);
        }
        if report.is_partial() {
            warn!(
                "Partial data: calendar {}, weather {}",
                report.schedule, report.weather
            );
        }

        self.enter(CycleStage::Render);
        self.display.render(&mut self.ctx.epd, &self.state).await
    }
}
