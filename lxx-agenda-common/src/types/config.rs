//! 设备配置
//!
//! 配置在启动时从编译期环境（`build.rs` 转发的 `.env`）一次性解析，
//! 整个唤醒周期内只读。

use core::fmt::Write;

use embassy_time::Duration;
use heapless::String;

use crate::types::{SystemError, SystemResult};

pub const DEFAULT_THING_NAME: &str = "eink-calendar";
pub const DEFAULT_MQTT_PORT: u16 = 8883;
pub const DEFAULT_SLEEP_MINUTES: u64 = 30;
pub const DEFAULT_DATA_TIMEOUT_SECS: u64 = 60;

pub type TopicString = String<96>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    pub version: u32,
    pub network_config: NetworkConfig,
    pub topic_config: TopicConfig,
    pub timing_config: TimingConfig,
    pub power_config: PowerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub wifi_ssid: String<32>,
    pub wifi_password: String<64>,
    pub mqtt_endpoint: String<128>,
    pub mqtt_port: u16,
    /// 设备名，同时作为 MQTT client id
    pub thing_name: String<64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicConfig {
    pub schedule: TopicString,
    pub weather: TopicString,
    pub status: TopicString,
    pub shadow_delta: TopicString,
    pub shadow_get: TopicString,
    pub shadow_get_accepted: TopicString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub associate_attempts: u16,
    pub associate_poll: Duration,
    pub time_sync_attempts: u8,
    pub time_sync_interval: Duration,
    pub subscribe_settle: Duration,
    pub data_timeout: Duration,
    pub data_poll: Duration,
    pub progress_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerConfig {
    pub sleep_duration: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            associate_attempts: 60,
            associate_poll: Duration::from_millis(500),
            time_sync_attempts: 10,
            time_sync_interval: Duration::from_secs(1),
            subscribe_settle: Duration::from_millis(500),
            data_timeout: Duration::from_secs(DEFAULT_DATA_TIMEOUT_SECS),
            data_poll: Duration::from_millis(100),
            progress_interval: Duration::from_secs(5),
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            sleep_duration: Duration::from_secs(DEFAULT_SLEEP_MINUTES * 60),
        }
    }
}

impl TopicConfig {
    /// 按设备名生成默认主题
    pub fn for_thing(thing_name: &str) -> SystemResult<Self> {
        Ok(Self {
            schedule: topic(format_args!("calendar/{}/events", thing_name))?,
            weather: topic(format_args!("calendar/{}/weather", thing_name))?,
            status: topic(format_args!("calendar/{}/status", thing_name))?,
            shadow_delta: topic(format_args!(
                "$aws/things/{}/shadow/update/delta",
                thing_name
            ))?,
            shadow_get: topic(format_args!("$aws/things/{}/shadow/get", thing_name))?,
            shadow_get_accepted: topic(format_args!(
                "$aws/things/{}/shadow/get/accepted",
                thing_name
            ))?,
        })
    }

    /// 接收数据需要订阅的全部主题，顺序固定
    pub fn subscriptions(&self) -> [&str; 4] {
        [
            self.shadow_delta.as_str(),
            self.shadow_get_accepted.as_str(),
            self.schedule.as_str(),
            self.weather.as_str(),
        ]
    }
}

impl SystemConfig {
    pub fn new(network_config: NetworkConfig) -> SystemResult<Self> {
        let topic_config = TopicConfig::for_thing(&network_config.thing_name)?;
        Ok(Self {
            version: 1,
            network_config,
            topic_config,
            timing_config: TimingConfig::default(),
            power_config: PowerConfig::default(),
        })
    }

    /// 从编译期环境变量构建配置
    pub fn from_build_env() -> SystemResult<Self> {
        let network_config = NetworkConfig {
            wifi_ssid: bounded(option_env!("LXX_WIFI_SSID").unwrap_or(""), "wifi ssid")?,
            wifi_password: bounded(
                option_env!("LXX_WIFI_PASSWORD").unwrap_or(""),
                "wifi password",
            )?,
            mqtt_endpoint: bounded(
                option_env!("LXX_MQTT_ENDPOINT").unwrap_or(""),
                "mqtt endpoint",
            )?,
            mqtt_port: option_env!("LXX_MQTT_PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_MQTT_PORT),
            thing_name: bounded(
                option_env!("LXX_THING_NAME").unwrap_or(DEFAULT_THING_NAME),
                "thing name",
            )?,
        };

        let mut config = Self::new(network_config)?;

        let overrides = [
            (option_env!("LXX_TOPIC_SCHEDULE"), &mut config.topic_config.schedule),
            (option_env!("LXX_TOPIC_WEATHER"), &mut config.topic_config.weather),
            (option_env!("LXX_TOPIC_STATUS"), &mut config.topic_config.status),
            (
                option_env!("LXX_TOPIC_SHADOW_DELTA"),
                &mut config.topic_config.shadow_delta,
            ),
            (
                option_env!("LXX_TOPIC_SHADOW_GET"),
                &mut config.topic_config.shadow_get,
            ),
            (
                option_env!("LXX_TOPIC_SHADOW_GET_ACCEPTED"),
                &mut config.topic_config.shadow_get_accepted,
            ),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                *slot = bounded(value, "topic")?;
            }
        }

        if let Some(minutes) = option_env!("LXX_SLEEP_MINUTES").and_then(|m| m.parse::<u64>().ok()) {
            config.power_config.sleep_duration = Duration::from_secs(minutes * 60);
        }
        if let Some(secs) = option_env!("LXX_DATA_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            config.timing_config.data_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn validate(&self) -> SystemResult<()> {
        if self.network_config.wifi_ssid.is_empty() {
            return Err(SystemError::InvalidConfig("wifi ssid"));
        }
        if self.network_config.mqtt_endpoint.is_empty() {
            return Err(SystemError::InvalidConfig("mqtt endpoint"));
        }
        if self.network_config.thing_name.is_empty() {
            return Err(SystemError::InvalidConfig("thing name"));
        }

        let timing = &self.timing_config;
        if timing.associate_attempts == 0 || timing.time_sync_attempts == 0 {
            return Err(SystemError::InvalidConfig("retry budget"));
        }
        if timing.data_poll.as_millis() == 0 || timing.associate_poll.as_millis() == 0 {
            return Err(SystemError::InvalidConfig("poll interval"));
        }
        Ok(())
    }
}

fn bounded<const N: usize>(value: &str, field: &'static str) -> SystemResult<String<N>> {
    String::try_from(value).map_err(|_| SystemError::InvalidConfig(field))
}

fn topic(args: core::fmt::Arguments<'_>) -> SystemResult<TopicString> {
    let mut s = TopicString::new();
    s.write_fmt(args)
        .map_err(|_| SystemError::InvalidConfig("topic"))?;
    Ok(s)
}
