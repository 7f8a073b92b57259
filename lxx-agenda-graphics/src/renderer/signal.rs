//! 连接信号指示
//!
//! 4 格柱状图。整帧绘制与失败路径的局部刷新共用同一区域和同一绘制函数，
//! 局部刷新窗口与区域完全重合，不会在双稳态屏上留下残影。

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use epd_waveshare::color::TriColor;
use lxx_agenda_common::PageWindow;

pub const SIGNAL_SEGMENTS: u8 = 4;

const AREA_X: u16 = 368;
const AREA_Y: u16 = 2;
const AREA_WIDTH: u16 = 24;
const AREA_HEIGHT: u16 = 16;

const BAR_WIDTH: u32 = 4;
const BAR_GAP: i32 = 2;
const BAR_STEP: u32 = 4;

/// 指示器所在区域（x 与宽度按 8 像素对齐）
pub const SIGNAL_WINDOW: PageWindow = PageWindow::new(AREA_X, AREA_Y, AREA_WIDTH, AREA_HEIGHT);

pub fn signal_area() -> Rectangle {
    Rectangle::new(
        Point::new(AREA_X as i32, AREA_Y as i32),
        Size::new(AREA_WIDTH as u32, AREA_HEIGHT as u32),
    )
}

/// 信号强度（dBm）到格数的阶梯映射
pub fn segments_for(quality: i32) -> u8 {
    match quality {
        q if q >= -50 => 4,
        q if q >= -60 => 3,
        q if q >= -70 => 2,
        q if q >= -80 => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalBars {
    pub segments: u8,
}

impl SignalBars {
    pub fn from_quality(quality: i32) -> Self {
        Self {
            segments: segments_for(quality),
        }
    }

    /// 清空的指示器：四格都不填充
    pub fn cleared() -> Self {
        Self { segments: 0 }
    }

    /// 错误屏使用的降级指示，最多一格
    pub fn reduced(quality: i32) -> Self {
        Self {
            segments: segments_for(quality).min(1),
        }
    }
}

impl Drawable for SignalBars {
    type Color = TriColor;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = TriColor>,
    {
        let area = signal_area();
        // 先铺白底，覆盖上一次的格数
        area.into_styled(PrimitiveStyle::with_fill(TriColor::White))
            .draw(target)?;

        let bottom = area.top_left.y + area.size.height as i32;
        for i in 0..SIGNAL_SEGMENTS {
            let height = BAR_STEP * (i as u32 + 1);
            let bar = Rectangle::new(
                Point::new(
                    area.top_left.x + i as i32 * (BAR_WIDTH as i32 + BAR_GAP),
                    bottom - height as i32,
                ),
                Size::new(BAR_WIDTH, height),
            );
            let style = if i < self.segments {
                PrimitiveStyle::with_fill(TriColor::Black)
            } else {
                PrimitiveStyle::with_stroke(TriColor::Black, 1)
            };
            bar.into_styled(style).draw(target)?;
        }
        Ok(())
    }
}
