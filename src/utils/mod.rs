//! Utility functions

pub mod time;

pub use time::{format_duration, now_utc};
