//! 天气图标
//!
//! 图标码为 OpenWeatherMap 格式：两位类别码 + `d`/`n` 后缀。
//! 类别码通过固定查表映射到 8 种绘制方式，未知类别使用云朵。

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, Polyline, PrimitiveStyle, Rectangle};
use epd_waveshare::color::TriColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
    Mist,
    Unknown,
}

impl IconKind {
    pub fn from_code(code: &str) -> Self {
        match code.get(..2) {
            Some("01") => IconKind::Clear,
            Some("02") => IconKind::PartlyCloudy,
            Some("03") | Some("04") => IconKind::Cloudy,
            Some("09") | Some("10") => IconKind::Rain,
            Some("11") => IconKind::Thunderstorm,
            Some("13") => IconKind::Snow,
            Some("50") => IconKind::Mist,
            _ => IconKind::Unknown,
        }
    }

    /// 实际使用的绘制方式
    pub fn renderer(self) -> IconKind {
        match self {
            IconKind::Unknown => IconKind::Cloudy,
            kind => kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherIcon {
    pub kind: IconKind,
    pub night: bool,
}

impl WeatherIcon {
    pub fn resolve(code: &str) -> Self {
        Self {
            kind: IconKind::from_code(code),
            night: code.as_bytes().get(2) == Some(&b'n'),
        }
    }

    /// 以 `center` 为中心、边长约 `size` 绘制
    pub fn draw<D>(&self, center: Point, size: u32, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = TriColor>,
    {
        let s = size as i32;
        let raised = center + Point::new(0, -s / 8);

        match self.kind.renderer() {
            IconKind::Clear => self.sky(center, s, target),
            IconKind::PartlyCloudy => {
                self.sky(center + Point::new(-s / 5, -s / 5), s * 3 / 5, target)?;
                cloud(center + Point::new(s / 10, s / 10), s * 3 / 4, target)
            }
            IconKind::Rain => {
                cloud(raised, s * 4 / 5, target)?;
                for i in -1..=1 {
                    let x = center.x + i * s / 4;
                    Line::new(
                        Point::new(x, center.y + s / 4),
                        Point::new(x - s / 10, center.y + s * 9 / 20),
                    )
                    .into_styled(PrimitiveStyle::with_stroke(TriColor::Black, 2))
                    .draw(target)?;
                }
                Ok(())
            }
            IconKind::Snow => {
                cloud(raised, s * 4 / 5, target)?;
                for i in -1..=1 {
                    flake(
                        Point::new(center.x + i * s / 4, center.y + s * 3 / 8),
                        s / 12,
                        target,
                    )?;
                }
                Ok(())
            }
            IconKind::Thunderstorm => {
                cloud(raised, s * 4 / 5, target)?;
                let bolt = [
                    Point::new(center.x + s / 12, center.y + s / 8),
                    Point::new(center.x - s / 12, center.y + s * 5 / 16),
                    Point::new(center.x + s / 24, center.y + s * 5 / 16),
                    Point::new(center.x - s / 12, center.y + s / 2),
                ];
                Polyline::new(&bolt)
                    .into_styled(PrimitiveStyle::with_stroke(TriColor::Chromatic, 2))
                    .draw(target)
            }
            IconKind::Mist => {
                for i in 0..4 {
                    let indent = if i % 2 == 0 { s / 10 } else { 0 };
                    let y = center.y - s / 4 + i * s / 6;
                    Line::new(
                        Point::new(center.x - s * 2 / 5 + indent, y),
                        Point::new(center.x + s * 2 / 5 - (s / 10 - indent), y),
                    )
                    .into_styled(PrimitiveStyle::with_stroke(TriColor::Black, 2))
                    .draw(target)?;
                }
                Ok(())
            }
            IconKind::Cloudy | IconKind::Unknown => cloud(center, s, target),
        }
    }

    fn sky<D>(&self, center: Point, s: i32, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = TriColor>,
    {
        if self.night {
            moon(center, s, target)
        } else {
            sun(center, s, target)
        }
    }
}

/// 8 个方向的单位向量（放大 100 倍）
const RAYS: [(i32, i32); 8] = [
    (100, 0),
    (71, 71),
    (0, 100),
    (-71, 71),
    (-100, 0),
    (-71, -71),
    (0, -100),
    (71, -71),
];

fn sun<D>(center: Point, s: i32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = TriColor>,
{
    Circle::with_center(center, (s / 2) as u32)
        .into_styled(PrimitiveStyle::with_fill(TriColor::Chromatic))
        .draw(target)?;

    let inner = s * 32 / 100;
    let outer = s * 46 / 100;
    for (dx, dy) in RAYS {
        Line::new(
            center + Point::new(dx * inner / 100, dy * inner / 100),
            center + Point::new(dx * outer / 100, dy * outer / 100),
        )
        .into_styled(PrimitiveStyle::with_stroke(TriColor::Chromatic, 2))
        .draw(target)?;
    }
    Ok(())
}

fn moon<D>(center: Point, s: i32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = TriColor>,
{
    let diameter = (s * 11 / 20) as u32;
    Circle::with_center(center, diameter)
        .into_styled(PrimitiveStyle::with_fill(TriColor::Black))
        .draw(target)?;
    // 白色圆遮住一侧形成月牙
    Circle::with_center(center + Point::new(s / 6, -s / 8), diameter)
        .into_styled(PrimitiveStyle::with_fill(TriColor::White))
        .draw(target)
}

fn cloud<D>(center: Point, s: i32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = TriColor>,
{
    let style = PrimitiveStyle::with_fill(TriColor::Black);

    Circle::with_center(center + Point::new(-s / 5, s / 20), (s * 2 / 5) as u32)
        .into_styled(style)
        .draw(target)?;
    Circle::with_center(center + Point::new(s / 10, -s / 15), (s / 2) as u32)
        .into_styled(style)
        .draw(target)?;
    Circle::with_center(center + Point::new(s * 3 / 10, s / 10), (s * 3 / 10) as u32)
        .into_styled(style)
        .draw(target)?;
    Rectangle::new(
        center + Point::new(-s * 2 / 5, 0),
        Size::new((s * 4 / 5) as u32, (s / 4) as u32),
    )
    .into_styled(style)
    .draw(target)
}

fn flake<D>(center: Point, r: i32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = TriColor>,
{
    let style = PrimitiveStyle::with_stroke(TriColor::Black, 1);
    let arms = [(r, 0), (0, r), (r, r), (r, -r)];
    for (dx, dy) in arms {
        Line::new(center - Point::new(dx, dy), center + Point::new(dx, dy))
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}
