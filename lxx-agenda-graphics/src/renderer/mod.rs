//! 渲染引擎模块
//! 负责把日程、天气和信号强度组合成画面，并按页栅格化到缓冲区

mod framebuffer;
mod icon;
mod layout;
mod signal;
mod text;

pub use framebuffer::PageBuffer;
pub use icon::{IconKind, WeatherIcon};
pub use layout::*;
pub use signal::*;
pub use text::*;

use embedded_graphics::Drawable;
use epd_waveshare::color::TriColor;
use lxx_agenda_common::PageWindow;

/// 把场景栅格化到一页
///
/// 场景按整屏坐标绘制，缓冲区只保留落在 `page` 内的像素。
pub fn render_page<S>(buffer: &mut PageBuffer, page: PageWindow, scene: &S)
where
    S: Drawable<Color = TriColor>,
{
    buffer.reset(page);
    // PageBuffer 的绘制不会失败
    let _ = scene.draw(buffer);
}
