pub mod arrival_sync;
pub mod display_service;
pub mod network_service;
pub mod power_service;
pub mod secure_channel;
pub mod time_service;

pub use arrival_sync::{ArrivalSynchronizer, Delivered};
pub use display_service::DisplayService;
pub use network_service::NetworkService;
pub use power_service::PowerService;
pub use secure_channel::SecureChannel;
pub use time_service::TimeService;
