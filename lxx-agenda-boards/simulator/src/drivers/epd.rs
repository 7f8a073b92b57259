//! 把每次刷新保存为 PNG 的模拟面板
//!
//! 面板内容在多次刷新之间保留，局部刷新只改写窗口内的像素，
//! 每次 `end_frame` 把整屏导出为一张图片。

use std::path::{Path, PathBuf};

use embassy_time::{Duration, Timer};
use image::{Rgb, RgbImage};
use lxx_agenda_common::*;

const PAPER: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
const BLACK_INK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const ACCENT_INK: Rgb<u8> = Rgb([0xC0, 0x10, 0x10]);

#[derive(Debug)]
pub enum PanelError {
    Unaligned(PageWindow),
    OutsideWindow(PageWindow),
    NoFrame,
    PlaneSize { expected: usize, got: usize },
    Io(std::io::Error),
    Image(image::ImageError),
}

pub struct PngPanel {
    out_dir: PathBuf,
    black: Vec<u8>,
    accent: Vec<u8>,
    frame: Option<(PageWindow, RefreshMode)>,
    frames_written: u32,
    full_refresh: Duration,
    partial_refresh: Duration,
}

impl PngPanel {
    pub fn new(out_dir: PathBuf, full_refresh: Duration, partial_refresh: Duration) -> Self {
        let plane = PageWindow::FULL_SCREEN.plane_bytes();
        Self {
            out_dir,
            black: vec![0; plane],
            accent: vec![0; plane],
            frame: None,
            frames_written: 0,
            full_refresh,
            partial_refresh,
        }
    }

    /// 当前面板内容：强调色优先于黑色
    pub fn snapshot(&self) -> RgbImage {
        let row_bytes = PageWindow::FULL_SCREEN.row_bytes();
        RgbImage::from_fn(EPD_WIDTH as u32, EPD_HEIGHT as u32, |x, y| {
            let index = y as usize * row_bytes + x as usize / 8;
            let mask = 0x80u8 >> (x % 8);
            if self.accent[index] & mask != 0 {
                ACCENT_INK
            } else if self.black[index] & mask != 0 {
                BLACK_INK
            } else {
                PAPER
            }
        })
    }

    fn save_frame(&self, path: &Path) -> Result<(), PanelError> {
        std::fs::create_dir_all(&self.out_dir).map_err(PanelError::Io)?;
        self.snapshot().save(path).map_err(PanelError::Image)
    }
}

impl EpdPanel for PngPanel {
    type Error = PanelError;

    async fn begin_frame(&mut self, window: PageWindow, mode: RefreshMode) -> Result<(), Self::Error> {
        if !window.is_byte_aligned() {
            return Err(PanelError::Unaligned(window));
        }
        if window.x + window.width > EPD_WIDTH || window.bottom() > EPD_HEIGHT {
            return Err(PanelError::OutsideWindow(window));
        }
        debug!("[Simulator EPD] Frame {:?} ({:?})", window, mode);
        self.frame = Some((window, mode));
        Ok(())
    }

    async fn write_page(
        &mut self,
        page: &PageWindow,
        black: &[u8],
        accent: &[u8],
    ) -> Result<(), Self::Error> {
        let Some((window, _)) = self.frame else {
            return Err(PanelError::NoFrame);
        };
        if page.x != window.x
            || page.width != window.width
            || page.y < window.y
            || page.bottom() > window.bottom()
        {
            return Err(PanelError::OutsideWindow(*page));
        }

        let row_bytes = page.row_bytes();
        let needed = page.plane_bytes();
        for plane in [black, accent] {
            if plane.len() < needed {
                return Err(PanelError::PlaneSize {
                    expected: needed,
                    got: plane.len(),
                });
            }
        }

        let panel_row_bytes = PageWindow::FULL_SCREEN.row_bytes();
        for row in 0..page.height as usize {
            let src = row * row_bytes;
            let dst = (page.y as usize + row) * panel_row_bytes + page.x as usize / 8;
            self.black[dst..dst + row_bytes].copy_from_slice(&black[src..src + row_bytes]);
            self.accent[dst..dst + row_bytes].copy_from_slice(&accent[src..src + row_bytes]);
        }
        Ok(())
    }

    async fn end_frame(&mut self) -> Result<(), Self::Error> {
        let Some((window, mode)) = self.frame.take() else {
            return Err(PanelError::NoFrame);
        };

        // busy 引脚的等待
        Timer::after(match mode {
            RefreshMode::Full => self.full_refresh,
            RefreshMode::Partial => self.partial_refresh,
        })
        .await;

        self.frames_written += 1;
        let path = self
            .out_dir
            .join(format!("frame-{:03}.png", self.frames_written));
        self.save_frame(&path)?;
        info!(
            "[Simulator EPD] {:?} refresh of {:?} written to {}",
            mode,
            window,
            path.display()
        );
        Ok(())
    }

    async fn hibernate(&mut self) -> Result<(), Self::Error> {
        debug!("[Simulator EPD] Hibernate");
        Ok(())
    }
}
