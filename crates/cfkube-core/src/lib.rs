pub mod auth;
pub mod error;
pub mod events;
pub mod id;
pub mod units;

pub use auth::AuthInfo;
pub use error::{CoreError, ErrorCategory, Result};
pub use events::{EventBroadcaster, StoreEvent, StoreOperation};
pub use id::generate_guid;
pub use units::to_megabytes;
