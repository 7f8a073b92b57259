mod drivers;

use std::sync::OnceLock;

use embassy_executor::Spawner;
use embassy_time::{Delay, Duration};
use lxx_agenda_common::*;
use lxx_agenda_core::core_main;

use drivers::{
    FileCredentialStore, LoopbackBroker, PngPanel, ScaledSleep, SimulatedWifi, SystemClockSntp,
    data_dir, env_flag, env_or,
};

pub struct Platform;

/// 回环代理按这些主题投递生产者数据
static TOPICS: OnceLock<TopicConfig> = OnceLock::new();

/// 配置缺失时代理不投递任何数据
fn unrouted_topics() -> TopicConfig {
    TopicConfig {
        schedule: TopicString::new(),
        weather: TopicString::new(),
        status: TopicString::new(),
        shadow_delta: TopicString::new(),
        shadow_get: TopicString::new(),
        shadow_get_accepted: TopicString::new(),
    }
}

/// 编译期配置，缺少的网络参数用模拟器默认值补齐
fn simulator_config() -> SystemResult<SystemConfig> {
    let mut config = SystemConfig::from_build_env()?;
    let network = &mut config.network_config;
    if network.wifi_ssid.is_empty() {
        network.wifi_ssid =
            heapless::String::try_from("simulator").map_err(|_| SystemError::InvalidConfig("wifi ssid"))?;
    }
    if network.mqtt_endpoint.is_empty() {
        network.mqtt_endpoint = heapless::String::try_from("localhost")
            .map_err(|_| SystemError::InvalidConfig("mqtt endpoint"))?;
    }
    config.timing_config.data_timeout = Duration::from_secs(env_or(
        "SIM_DATA_TIMEOUT_SECS",
        config.timing_config.data_timeout.as_secs(),
    ));
    Ok(config)
}

impl PlatformTrait for Platform {
    type Wifi = SimulatedWifi;
    type Sntp = SystemClockSntp;
    type Credentials = FileCredentialStore;
    type PubSub = LoopbackBroker;
    type Epd = PngPanel;
    type Sleep = ScaledSleep;
    type Delay = Delay;

    async fn init() -> PlatformContext<Self> {
        let data = data_dir();
        let topics = TOPICS.get().cloned().unwrap_or_else(unrouted_topics);

        PlatformContext {
            wifi: SimulatedWifi::new(
                Duration::from_millis(env_or("SIM_WIFI_CONNECT_MS", 1500)),
                env_or("SIM_RSSI", -58),
                env_flag("SIM_WIFI_FAIL"),
            ),
            sntp: SystemClockSntp::new(env_flag("SIM_SNTP_FAIL")),
            credentials: FileCredentialStore::new(data.clone()),
            pubsub: LoopbackBroker::new(
                topics,
                data,
                Duration::from_millis(env_or("SIM_PRODUCER_DELAY_MS", 2000)),
                env_flag("SIM_BROKER_REFUSE"),
            ),
            epd: PngPanel::new(
                std::env::var("SIM_OUT_DIR")
                    .unwrap_or_else(|_| "target/sim-frames".to_string())
                    .into(),
                Duration::from_millis(env_or("SIM_FULL_REFRESH_MS", 300)),
                Duration::from_millis(env_or("SIM_PARTIAL_REFRESH_MS", 50)),
            ),
            sleep: ScaledSleep::new(
                env_or("SIM_SLEEP_SCALE", 600),
                env_or("SIM_CYCLES", 1),
                Self::sys_stop,
            ),
            delay: Delay,
        }
    }

    fn sys_stop() {
        info!("Simulator platform stop");
        std::process::exit(0);
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match simulator_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return;
        }
    };

    let _ = TOPICS.set(config.topic_config.clone());

    if let Err(e) = core_main::<Platform>(config).await {
        error!("Main task error: {:?}", e);
    }
}
