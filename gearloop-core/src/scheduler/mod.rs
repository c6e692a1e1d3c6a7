//! Tick scheduling
//!
//! Splits the single base timer tick into the button rate and the speed
//! loop rate.

mod ticker;

pub use ticker::{RateDivider, TickDue, TickScheduler};
