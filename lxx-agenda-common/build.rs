//! 构建脚本：把 `.env` 中的 `LXX_*` 配置项转成编译期环境变量
//!
//! 设备配置（WiFi、接入点、设备名、主题、休眠时长）在编译期固化，
//! 运行期通过 `option_env!` 读取，不会在唤醒周期内重新加载。

const CONFIG_KEYS: [&str; 13] = [
    "LXX_WIFI_SSID",
    "LXX_WIFI_PASSWORD",
    "LXX_MQTT_ENDPOINT",
    "LXX_MQTT_PORT",
    "LXX_THING_NAME",
    "LXX_TOPIC_SCHEDULE",
    "LXX_TOPIC_WEATHER",
    "LXX_TOPIC_STATUS",
    "LXX_TOPIC_SHADOW_DELTA",
    "LXX_TOPIC_SHADOW_GET",
    "LXX_TOPIC_SHADOW_GET_ACCEPTED",
    "LXX_SLEEP_MINUTES",
    "LXX_DATA_TIMEOUT_SECS",
];

fn main() {
    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    let Ok(path) = dotenvy::dotenv() else {
        return;
    };
    println!("cargo:rerun-if-changed={}", path.display());

    // 进程环境优先于 .env 文件，dotenvy 不会覆盖已存在的变量
    for key in CONFIG_KEYS {
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={key}={value}");
        }
    }
}
