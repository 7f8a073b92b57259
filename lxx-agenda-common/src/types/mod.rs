pub mod config;
pub mod cycle;
pub mod display;
pub mod error;
pub mod message;
pub mod schedule;
pub mod weather;

pub use config::*;
pub use cycle::*;
pub use display::*;
pub use error::*;
pub use message::*;
pub use schedule::*;
pub use weather::*;
