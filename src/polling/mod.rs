//! Polling view binding
//!
//! Keeps one piece of displayed data approximately fresh by re-querying on a fixed
//! interval, with cleanup when the panel goes away.

pub mod subscription;
pub mod view_state;

pub use subscription::{Subscription, subscribe};
