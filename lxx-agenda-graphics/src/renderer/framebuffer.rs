//! 页缓冲区
//!
//! 整帧三色缓冲放不进内存，每次只缓存一个页窗口。
//! 绘制使用面板绝对坐标，落在窗口外的像素被丢弃，
//! 所以同一个场景可以对每一页重复绘制。

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use epd_waveshare::color::TriColor;
use lxx_agenda_common::{EPD_HEIGHT, EPD_WIDTH, PageWindow};

/// 两个 1 bit 平面：黑色与强调色，置位表示着墨
#[derive(Debug, Clone)]
pub struct PageBuffer {
    window: PageWindow,
    black: Vec<u8>,
    accent: Vec<u8>,
}

impl PageBuffer {
    pub fn new(window: PageWindow) -> Self {
        let bytes = window.plane_bytes();
        Self {
            window,
            black: vec![0; bytes],
            accent: vec![0; bytes],
        }
    }

    /// 整屏缓冲，用于测试与模拟器截图
    pub fn full_screen() -> Self {
        Self::new(PageWindow::FULL_SCREEN)
    }

    /// 切换到下一页并清为白色，尽量复用已分配的内存
    pub fn reset(&mut self, window: PageWindow) {
        let bytes = window.plane_bytes();
        self.window = window;
        self.black.clear();
        self.black.resize(bytes, 0);
        self.accent.clear();
        self.accent.resize(bytes, 0);
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn black_plane(&self) -> &[u8] {
        &self.black
    }

    pub fn accent_plane(&self) -> &[u8] {
        &self.accent
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        let w = &self.window;
        let (left, top) = (w.x as i32, w.y as i32);
        if x < left || y < top || x >= left + w.width as i32 || y >= top + w.height as i32 {
            return None;
        }
        let (col, row) = ((x - left) as usize, (y - top) as usize);
        Some((row * w.row_bytes() + col / 8, 0x80 >> (col % 8)))
    }

    /// 读取绝对坐标处的颜色，窗口外返回 `None`
    pub fn pixel(&self, x: i32, y: i32) -> Option<TriColor> {
        let (index, mask) = self.locate(x, y)?;
        Some(if self.accent[index] & mask != 0 {
            TriColor::Chromatic
        } else if self.black[index] & mask != 0 {
            TriColor::Black
        } else {
            TriColor::White
        })
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: TriColor) {
        let Some((index, mask)) = self.locate(x, y) else {
            return;
        };
        let (black, accent) = match color {
            TriColor::Black => (true, false),
            TriColor::Chromatic => (false, true),
            TriColor::White => (false, false),
        };
        if black {
            self.black[index] |= mask;
        } else {
            self.black[index] &= !mask;
        }
        if accent {
            self.accent[index] |= mask;
        } else {
            self.accent[index] &= !mask;
        }
    }

    /// 非白色像素数
    pub fn inked_pixels(&self) -> usize {
        self.black
            .iter()
            .zip(self.accent.iter())
            .map(|(b, a)| (b | a).count_ones() as usize)
            .sum()
    }
}

impl Dimensions for PageBuffer {
    /// 场景按整屏坐标布局，边界始终是整块面板
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(EPD_WIDTH as u32, EPD_HEIGHT as u32))
    }
}

impl DrawTarget for PageBuffer {
    type Color = TriColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}
