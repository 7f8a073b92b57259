/// 面板分辨率（4.2 寸黑白红三色屏）
pub const EPD_WIDTH: u16 = 400;
pub const EPD_HEIGHT: u16 = 300;

/// 每页行数，整帧不能一次放进内存，按页重复绘制
pub const EPD_PAGE_ROWS: u16 = 100;

/// 刷新方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// 全屏刷新：慢，清除残影
    Full,
    /// 局部窗口刷新：快，窗口必须与上次绘制完全对齐
    Partial,
}

/// 面板上的矩形窗口，x 与宽度按 8 像素对齐
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl PageWindow {
    pub const FULL_SCREEN: PageWindow = PageWindow {
        x: 0,
        y: 0,
        width: EPD_WIDTH,
        height: EPD_HEIGHT,
    };

    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 每行占用的字节数（1 bit/像素）
    pub const fn row_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// 单个颜色平面的字节数
    pub const fn plane_bytes(&self) -> usize {
        self.row_bytes() * self.height as usize
    }

    pub const fn is_byte_aligned(&self) -> bool {
        self.x % 8 == 0 && self.width % 8 == 0
    }

    pub fn bottom(&self) -> u16 {
        self.y + self.height
    }

    /// 按页切分窗口
    pub fn pages(&self, page_rows: u16) -> impl Iterator<Item = PageWindow> + '_ {
        let rows = page_rows.max(1);
        (self.y..self.bottom())
            .step_by(rows as usize)
            .map(move |top| PageWindow {
                x: self.x,
                y: top,
                width: self.width,
                height: rows.min(self.bottom() - top),
            })
    }
}
