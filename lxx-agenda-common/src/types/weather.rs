//! 天气文档
//!
//! `{"date":..,"forecast":[{"temp":..,"icon":"10d","hour":..}, ..],"current":{..}}`
//! forecast 第一项为当前天气，其后最多 3 项为未来时段。

use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use crate::types::DocumentError;

/// 当前 + 3 个预报时段
pub const MAX_FORECAST_SAMPLES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeatherSample {
    #[serde(rename = "temp")]
    pub temperature: i32,
    /// 两位类别码 + d/n 后缀
    #[serde(rename = "icon", default)]
    pub icon_code: String,
    #[serde(default)]
    pub hour: u8,
}

/// 可选的实况对象
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentConditions {
    #[serde(rename = "temp")]
    pub temperature: i32,
    #[serde(rename = "icon", default)]
    pub icon_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub feels_like: Option<i32>,
}

#[derive(Deserialize)]
struct RawWeatherDocument {
    #[serde(default)]
    date: String,
    #[serde(default)]
    forecast: Vec<WeatherSample>,
    #[serde(default)]
    current: Option<CurrentConditions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeatherDocument {
    pub date_label: String,
    pub forecast: heapless::Vec<WeatherSample, MAX_FORECAST_SAMPLES>,
    pub current: Option<CurrentConditions>,
}

impl WeatherDocument {
    pub fn parse(payload: &[u8]) -> Result<Self, DocumentError> {
        let text = core::str::from_utf8(payload).map_err(|_| DocumentError::NotUtf8)?;
        let raw: RawWeatherDocument =
            serde_json::from_str(text).map_err(|_| DocumentError::Malformed)?;

        let mut forecast = heapless::Vec::new();
        for sample in raw.forecast.into_iter().take(MAX_FORECAST_SAMPLES) {
            let _ = forecast.push(sample);
        }

        Ok(Self {
            date_label: raw.date,
            forecast,
            current: raw.current,
        })
    }

    /// 大字区域显示的样本：forecast 首项，缺失时退回实况对象
    pub fn headline_sample(&self) -> Option<WeatherSample> {
        if let Some(first) = self.forecast.first() {
            return Some(first.clone());
        }
        self.current.as_ref().map(|c| WeatherSample {
            temperature: c.temperature,
            icon_code: c.icon_code.clone(),
            hour: 0,
        })
    }

    /// 紧凑预报行，最多 3 项
    pub fn upcoming(&self) -> &[WeatherSample] {
        self.forecast.get(1..).unwrap_or(&[])
    }
}
