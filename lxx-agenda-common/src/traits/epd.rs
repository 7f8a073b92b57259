use crate::types::{PageWindow, RefreshMode};

/// 分页写入的三色电子纸面板
///
/// 一帧由 `begin_frame`、若干 `write_page` 和 `end_frame` 组成，
/// `end_frame` 触发刷新并等待 busy 结束。
pub trait EpdPanel {
    type Error: core::fmt::Debug;

    async fn begin_frame(&mut self, window: PageWindow, mode: RefreshMode)
        -> Result<(), Self::Error>;

    /// 写入一页：黑色平面与强调色平面，每像素 1 bit，行按字节对齐
    async fn write_page(
        &mut self,
        page: &PageWindow,
        black: &[u8],
        accent: &[u8],
    ) -> Result<(), Self::Error>;

    async fn end_frame(&mut self) -> Result<(), Self::Error>;

    async fn hibernate(&mut self) -> Result<(), Self::Error>;
}
