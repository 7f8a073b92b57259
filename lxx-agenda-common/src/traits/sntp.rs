/// 2020-01-01T00:00:00Z，早于此值说明时钟尚未同步
pub const MIN_VALID_EPOCH: i64 = 1_577_836_800;

pub trait SntpClient {
    type Error: core::fmt::Debug;

    /// 当前 UTC 时间（Unix 秒）
    async fn get_time(&mut self) -> Result<i64, Self::Error>;
}
