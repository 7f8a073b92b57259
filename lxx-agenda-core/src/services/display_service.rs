//! 显示适配
//!
//! 把渲染结果按页写入面板。全屏刷新用于加载提示、最终画面和错误屏；
//! 局部刷新只用于加载提示之前的失败，清空信号指示，保留上次的画面。

use embedded_graphics::Drawable;
use epd_waveshare::color::TriColor;
use lxx_agenda_common::*;
use lxx_agenda_graphics::{
    PageBuffer, SIGNAL_WINDOW, SignalBars, compose_error_screen, compose_frame,
    compose_loading_screen, render_page,
};

pub struct DisplayService {
    buffer: PageBuffer,
    loading_shown: bool,
    full_refreshes: u32,
    partial_refreshes: u32,
}

impl DisplayService {
    pub fn new() -> Self {
        Self {
            buffer: PageBuffer::new(PageWindow::new(0, 0, EPD_WIDTH, EPD_PAGE_ROWS)),
            loading_shown: false,
            full_refreshes: 0,
            partial_refreshes: 0,
        }
    }

    pub fn full_refreshes(&self) -> u32 {
        self.full_refreshes
    }

    pub fn partial_refreshes(&self) -> u32 {
        self.partial_refreshes
    }

    /// 一帧：逐页栅格化同一个场景并写入面板，最后触发刷新
    async fn draw_frame<E, S>(
        &mut self,
        epd: &mut E,
        window: PageWindow,
        mode: RefreshMode,
        scene: &S,
    ) -> SystemResult<()>
    where
        E: EpdPanel,
        S: Drawable<Color = TriColor>,
    {
        epd.begin_frame(window, mode).await.map_err(display_error)?;
        for page in window.pages(EPD_PAGE_ROWS) {
            render_page(&mut self.buffer, page, scene);
            epd.write_page(&page, self.buffer.black_plane(), self.buffer.accent_plane())
                .await
                .map_err(display_error)?;
        }
        epd.end_frame().await.map_err(display_error)?;

        match mode {
            RefreshMode::Full => self.full_refreshes += 1,
            RefreshMode::Partial => self.partial_refreshes += 1,
        }
        Ok(())
    }

    pub async fn show_loading<E: EpdPanel>(
        &mut self,
        epd: &mut E,
        signal_quality: i32,
    ) -> SystemResult<()> {
        info!("Showing loading indicator");
        let frame = compose_loading_screen(signal_quality);
        self.draw_frame(epd, PageWindow::FULL_SCREEN, RefreshMode::Full, &frame)
            .await?;
        self.loading_shown = true;
        Ok(())
    }

    /// 只清空信号指示，其余内容依靠双稳态保持
    pub async fn clear_signal_indicator<E: EpdPanel>(&mut self, epd: &mut E) -> SystemResult<()> {
        info!("Clearing signal indicator (partial refresh)");
        self.draw_frame(epd, SIGNAL_WINDOW, RefreshMode::Partial, &SignalBars::cleared())
            .await
    }

    pub async fn show_error<E: EpdPanel>(
        &mut self,
        epd: &mut E,
        error: &SystemError,
        signal_quality: i32,
    ) -> SystemResult<()> {
        info!("Showing error screen: {}", error.headline());
        let frame = compose_error_screen(error, signal_quality);
        self.draw_frame(epd, PageWindow::FULL_SCREEN, RefreshMode::Full, &frame)
            .await
    }

    /// 失败时的显示：加载提示已出现则画错误屏，否则只做局部清除
    pub async fn report_failure<E: EpdPanel>(
        &mut self,
        epd: &mut E,
        error: &SystemError,
        signal_quality: i32,
    ) {
        let result = if self.loading_shown {
            self.show_error(epd, error, signal_quality).await
        } else {
            self.clear_signal_indicator(epd).await
        };
        if let Err(e) = result {
            error!("Failed to show failure state: {}", e);
        }
    }

    /// 渲染最终画面，无法解析的文档只影响自己的区域
    pub async fn render<E: EpdPanel>(&mut self, epd: &mut E, state: &CycleState) -> SystemResult<()> {
        let schedule = if state.schedule_received {
            ScheduleDocument::parse(state.schedule_payload.as_bytes())
                .map_err(|e| warn!("Calendar document unusable: {}", e))
                .ok()
        } else {
            None
        };
        let weather = if state.weather_received {
            WeatherDocument::parse(state.weather_payload.as_bytes())
                .map_err(|e| warn!("Weather document unusable: {}", e))
                .ok()
        } else {
            None
        };

        if let Some(doc) = &schedule {
            if doc.dropped() > 0 {
                info!("Showing {} of {} events", doc.entries.len(), doc.total);
            }
        }

        info!("Rendering display");
        let frame = compose_frame(schedule.as_ref(), weather.as_ref(), state.signal_quality);
        self.draw_frame(epd, PageWindow::FULL_SCREEN, RefreshMode::Full, &frame)
            .await?;
        info!("Display updated");
        Ok(())
    }

    pub async fn hibernate<E: EpdPanel>(&mut self, epd: &mut E) {
        if let Err(e) = epd.hibernate().await {
            warn!("Display hibernate failed: {:?}", e);
        }
    }
}

impl Default for DisplayService {
    fn default() -> Self {
        Self::new()
    }
}

fn display_error<E: core::fmt::Debug>(e: E) -> SystemError {
    error!("Display bus error: {:?}", e);
    SystemError::DisplayError
}
