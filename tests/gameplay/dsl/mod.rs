//! Test DSL for the gameplay engine.
//!
//! A [`SessionDriver`] collects song-time steps, each with key actions to apply before the tick
//! and assertions to check after it, then runs them against a [`Session`] in order.
//!
//! # Core Types
//!
//! - [`SessionDriver`] - owns the session and the list of steps
//! - [`StepBuilder`] - adds actions and assertions to the last step
//!
//! # Usage Example
//!
//! ```ignore
//! SessionDriver::new(GameConfig::default(), &timeline)
//!     .at(0.5)
//!         .view(|s| assert!(s.has_unresolved_on_screen()))
//!     .at(0.51)
//!         .press(InputKey::A)
//!         .feedback(|fb| assert_eq!(fb.len(), 1))
//!     .run();
//! ```
//!
//! [`Session`]: riff_hero::play::session::Session

mod driver;
mod time_step;

pub use driver::SessionDriver;
pub use time_step::{StepBuilder, TestSession};
