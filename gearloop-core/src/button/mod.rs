//! Button input handling
//!
//! Debounces raw levels and recognizes press, click, repeat and long-press
//! gestures for a fixed set of buttons. The engine is advanced from the
//! button tick; events reach the application through per-button callbacks,
//! the return value of [`ButtonEngine::advance_all`], and the
//! [`ButtonQueue`].

mod engine;
mod event;
mod machine;
mod queue;

pub use engine::{ButtonEngine, ButtonError, ButtonHandle, ButtonReport, ButtonReports};
pub use event::{ButtonEvent, EventMask};
pub use machine::{Button, ButtonCallback, ButtonState};
pub use queue::ButtonQueue;
