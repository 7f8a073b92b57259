pub mod credentials;
pub mod epd;
pub mod platform;
pub mod pubsub;
pub mod sleep;
pub mod sntp;
pub mod wifi;

pub use credentials::*;
pub use epd::*;
pub use platform::*;
pub use pubsub::*;
pub use sleep::*;
pub use sntp::*;
pub use wifi::*;
