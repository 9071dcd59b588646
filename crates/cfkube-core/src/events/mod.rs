//! Store change events.
//!
//! Every successful mutation performed through an evented store is published
//! on an [`EventBroadcaster`] as a [`StoreEvent`]. Subscribers see events in
//! the order the mutations completed.
//!
//! ```text
//!   EventedStore ──► EventBroadcaster ──► subscriber (CLI change log)
//!                    (tokio broadcast) ──► subscriber (tests)
//! ```

pub mod broadcaster;
pub mod types;

pub use broadcaster::EventBroadcaster;
pub use types::{StoreEvent, StoreOperation};
