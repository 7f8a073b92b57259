//! 画面布局
//!
//! 把日程、天气和信号强度组合成一组绝对定位的元素。
//! 元素与页无关，分页绘制时每一页都重新绘制全部元素，由页缓冲裁剪。

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_7X13, FONT_9X15, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use epd_waveshare::color::TriColor;
use lxx_agenda_common::{
    EPD_WIDTH, ScheduleDocument, ScheduleEntry, SystemError, WeatherDocument, WeatherSample,
};

use super::icon::WeatherIcon;
use super::signal::SignalBars;
use super::text::{DESCRIPTION_MAX_CHARS, TIME_LABEL_MAX_CHARS, TITLE_MAX_CHARS, fit};

/// 天气区
const WEATHER_TOP: i32 = 22;
const DIVIDER_Y: i32 = 112;
/// 日程区
const SCHEDULE_TOP: i32 = 116;
const ENTRY_HEIGHT: i32 = 30;

const FORECAST_LEFT: i32 = 200;
const FORECAST_SLOT_WIDTH: i32 = 66;
pub const FORECAST_SLOTS: usize = 3;

pub const NO_EVENTS_TEXT: &str = "No events";
pub const NO_SCHEDULE_TEXT: &str = "No schedule data";
pub const NO_WEATHER_TEXT: &str = "No weather data";
pub const LOADING_TEXT: &str = "Updating...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
    Huge,
}

impl FontSize {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontSize::Small => &FONT_6X10,
            FontSize::Medium => &FONT_7X13,
            FontSize::Large => &FONT_9X15,
            FontSize::Huge => &FONT_10X20,
        }
    }

    pub fn char_width(self) -> i32 {
        self.font().character_size.width as i32
    }
}

/// 元素所属区域，便于按区域统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    CurrentWeather,
    ForecastSlot(u8),
    ScheduleEntry(u8),
    Placeholder,
    Divider,
    Status,
    Signal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Text {
        text: String,
        position: Point,
        size: FontSize,
        color: TriColor,
    },
    /// 数值 + 度数圆圈 + `C`（字体没有 `°`）
    Temperature {
        value: i32,
        position: Point,
        size: FontSize,
    },
    Icon {
        icon: WeatherIcon,
        center: Point,
        size: u32,
    },
    Rule {
        start: Point,
        end: Point,
    },
    AccentBar(Rectangle),
    Signal(SignalBars),
}

impl Element {
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = TriColor>,
    {
        match self {
            Element::Text {
                text,
                position,
                size,
                color,
            } => {
                let style = MonoTextStyle::new(size.font(), *color);
                Text::with_baseline(text, *position, style, Baseline::Top).draw(target)?;
            }
            Element::Temperature {
                value,
                position,
                size,
            } => {
                let digits = format!("{}", value);
                let style = MonoTextStyle::new(size.font(), TriColor::Black);
                Text::with_baseline(&digits, *position, style, Baseline::Top).draw(target)?;

                let width = size.char_width();
                let diameter = (width / 2).max(3) as u32;
                let ring_x = position.x + digits.len() as i32 * width + 1;
                Circle::new(Point::new(ring_x, position.y + 1), diameter)
                    .into_styled(PrimitiveStyle::with_stroke(TriColor::Black, 1))
                    .draw(target)?;
                Text::with_baseline(
                    "C",
                    Point::new(ring_x + diameter as i32 + 1, position.y),
                    style,
                    Baseline::Top,
                )
                .draw(target)?;
            }
            Element::Icon { icon, center, size } => icon.draw(*center, *size, target)?,
            Element::Rule { start, end } => {
                Line::new(*start, *end)
                    .into_styled(PrimitiveStyle::with_stroke(TriColor::Black, 1))
                    .draw(target)?;
            }
            Element::AccentBar(area) => {
                area.into_styled(PrimitiveStyle::with_fill(TriColor::Chromatic))
                    .draw(target)?;
            }
            Element::Signal(bars) => bars.draw(target)?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    pub region: Region,
    pub element: Element,
}

/// 一帧完整画面
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub elements: Vec<Placed>,
}

impl Frame {
    fn push(&mut self, region: Region, element: Element) {
        self.elements.push(Placed { region, element });
    }

    fn text(&mut self, region: Region, text: String, position: Point, size: FontSize, color: TriColor) {
        self.push(
            region,
            Element::Text {
                text,
                position,
                size,
                color,
            },
        );
    }

    pub fn in_region(&self, region: Region) -> impl Iterator<Item = &Element> + '_ {
        self.elements
            .iter()
            .filter(move |p| p.region == region)
            .map(|p| &p.element)
    }

    /// 已绘制的日程条目数
    pub fn schedule_entries(&self) -> usize {
        self.distinct(|r| matches!(r, Region::ScheduleEntry(_)))
    }

    pub fn forecast_slots(&self) -> usize {
        self.distinct(|r| matches!(r, Region::ForecastSlot(_)))
    }

    pub fn has_current_weather(&self) -> bool {
        self.in_region(Region::CurrentWeather).next().is_some()
    }

    pub fn signal(&self) -> Option<SignalBars> {
        self.elements.iter().find_map(|p| match p.element {
            Element::Signal(bars) => Some(bars),
            _ => None,
        })
    }

    /// 所有文本元素（按加入顺序）
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements.iter().filter_map(|p| match &p.element {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn distinct(&self, matches: impl Fn(Region) -> bool) -> usize {
        let mut seen: Vec<Region> = Vec::new();
        for placed in &self.elements {
            if matches(placed.region) && !seen.contains(&placed.region) {
                seen.push(placed.region);
            }
        }
        seen.len()
    }
}

impl Drawable for Frame {
    type Color = TriColor;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = TriColor>,
    {
        for placed in &self.elements {
            placed.element.draw(target)?;
        }
        Ok(())
    }
}

/// 组合完整画面
///
/// 文档为 `None` 表示未收到或解析失败，对应区域显示占位文本，
/// 另一区域不受影响。
pub fn compose_frame(
    schedule: Option<&ScheduleDocument>,
    weather: Option<&WeatherDocument>,
    signal_quality: i32,
) -> Frame {
    let mut frame = Frame::default();

    let header = match weather {
        Some(doc) if !doc.date_label.is_empty() => fit(&doc.date_label, 36),
        _ => String::from("Calendar"),
    };
    frame.text(Region::Header, header, Point::new(6, 3), FontSize::Large, TriColor::Black);
    frame.push(
        Region::Signal,
        Element::Signal(SignalBars::from_quality(signal_quality)),
    );

    compose_weather(&mut frame, weather);

    frame.push(
        Region::Divider,
        Element::Rule {
            start: Point::new(0, DIVIDER_Y),
            end: Point::new(EPD_WIDTH as i32 - 1, DIVIDER_Y),
        },
    );

    compose_schedule(&mut frame, schedule);
    frame
}

fn compose_weather(frame: &mut Frame, weather: Option<&WeatherDocument>) {
    let headline = weather.and_then(|doc| doc.headline_sample().map(|sample| (doc, sample)));
    let Some((doc, current)) = headline else {
        frame.text(
            Region::Placeholder,
            String::from(NO_WEATHER_TEXT),
            Point::new(84, 56),
            FontSize::Large,
            TriColor::Black,
        );
        return;
    };

    frame.push(
        Region::CurrentWeather,
        Element::Icon {
            icon: WeatherIcon::resolve(&current.icon_code),
            center: Point::new(40, WEATHER_TOP + 40),
            size: 64,
        },
    );
    frame.push(
        Region::CurrentWeather,
        Element::Temperature {
            value: current.temperature,
            position: Point::new(84, WEATHER_TOP + 12),
            size: FontSize::Huge,
        },
    );

    if let Some(conditions) = &doc.current {
        if !conditions.description.is_empty() {
            frame.text(
                Region::CurrentWeather,
                fit(&conditions.description, 18),
                Point::new(84, WEATHER_TOP + 38),
                FontSize::Small,
                TriColor::Black,
            );
        }
        let mut extra = String::new();
        if let Some(humidity) = conditions.humidity {
            extra.push_str(&format!("RH {}%", humidity));
        }
        if let Some(feels) = conditions.feels_like {
            if !extra.is_empty() {
                extra.push(' ');
            }
            extra.push_str(&format!("Feels {}C", feels));
        }
        if !extra.is_empty() {
            frame.text(
                Region::CurrentWeather,
                extra,
                Point::new(84, WEATHER_TOP + 52),
                FontSize::Small,
                TriColor::Black,
            );
        }
    }

    for (i, sample) in doc.upcoming().iter().take(FORECAST_SLOTS).enumerate() {
        compose_forecast_slot(frame, i, sample);
    }
}

fn compose_forecast_slot(frame: &mut Frame, slot: usize, sample: &WeatherSample) {
    let region = Region::ForecastSlot(slot as u8);
    let left = FORECAST_LEFT + slot as i32 * FORECAST_SLOT_WIDTH;

    frame.text(
        region,
        format!("{:02}:00", sample.hour.min(23)),
        Point::new(left + 18, WEATHER_TOP + 4),
        FontSize::Small,
        TriColor::Black,
    );
    frame.push(
        region,
        Element::Icon {
            icon: WeatherIcon::resolve(&sample.icon_code),
            center: Point::new(left + FORECAST_SLOT_WIDTH / 2, WEATHER_TOP + 40),
            size: 32,
        },
    );
    frame.push(
        region,
        Element::Temperature {
            value: sample.temperature,
            position: Point::new(left + 20, WEATHER_TOP + 62),
            size: FontSize::Small,
        },
    );
}

fn compose_schedule(frame: &mut Frame, schedule: Option<&ScheduleDocument>) {
    let placeholder = match schedule {
        None => Some(NO_SCHEDULE_TEXT),
        Some(doc) if doc.is_empty() => Some(NO_EVENTS_TEXT),
        Some(_) => None,
    };
    if let Some(text) = placeholder {
        frame.text(
            Region::Placeholder,
            String::from(text),
            Point::new(12, SCHEDULE_TOP + 8),
            FontSize::Large,
            TriColor::Black,
        );
        return;
    }

    if let Some(doc) = schedule {
        for (i, entry) in doc.entries.iter().enumerate() {
            compose_entry(frame, i, entry);
        }
    }
}

fn compose_entry(frame: &mut Frame, index: usize, entry: &ScheduleEntry) {
    let region = Region::ScheduleEntry(index as u8);
    let top = SCHEDULE_TOP + index as i32 * ENTRY_HEIGHT;
    let label_color = if entry.is_multiday {
        TriColor::Chromatic
    } else {
        TriColor::Black
    };

    if entry.is_multiday {
        frame.push(
            region,
            Element::AccentBar(Rectangle::new(Point::new(4, top + 2), Size::new(3, 24))),
        );
    }
    frame.text(
        region,
        fit(&entry.time_label, TIME_LABEL_MAX_CHARS),
        Point::new(12, top + 3),
        FontSize::Small,
        label_color,
    );
    frame.text(
        region,
        fit(&entry.title, TITLE_MAX_CHARS),
        Point::new(140, top + 1),
        FontSize::Medium,
        TriColor::Black,
    );
    if !entry.description.is_empty() {
        frame.text(
            region,
            fit(&entry.description, DESCRIPTION_MAX_CHARS),
            Point::new(140, top + 16),
            FontSize::Small,
            TriColor::Black,
        );
    }
}

/// 加载提示：全屏刷新，连上网络后第一件事
pub fn compose_loading_screen(signal_quality: i32) -> Frame {
    let mut frame = Frame::default();
    frame.text(
        Region::Header,
        String::from("Calendar"),
        Point::new(6, 3),
        FontSize::Large,
        TriColor::Black,
    );
    frame.push(
        Region::Signal,
        Element::Signal(SignalBars::from_quality(signal_quality)),
    );
    frame.text(
        Region::Status,
        String::from(LOADING_TEXT),
        Point::new(145, 140),
        FontSize::Huge,
        TriColor::Black,
    );
    frame
}

/// 错误屏：标题 + 说明，信号指示最多一格
pub fn compose_error_screen(error: &SystemError, signal_quality: i32) -> Frame {
    let mut frame = Frame::default();
    frame.text(
        Region::Header,
        String::from("Calendar"),
        Point::new(6, 3),
        FontSize::Large,
        TriColor::Black,
    );
    frame.push(
        Region::Signal,
        Element::Signal(SignalBars::reduced(signal_quality)),
    );

    let headline = error.headline();
    let left = (EPD_WIDTH as i32 - headline.len() as i32 * FontSize::Huge.char_width()) / 2;
    frame.text(
        Region::Status,
        String::from(headline),
        Point::new(left.max(0), 120),
        FontSize::Huge,
        TriColor::Chromatic,
    );
    frame.text(
        Region::Status,
        fit(error.detail(), 60),
        Point::new(20, 150),
        FontSize::Small,
        TriColor::Black,
    );
    frame
}
