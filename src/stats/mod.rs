//! Statistics stages
//!
//! Every stage reads an immutable [`WheelHistory`](crate::WheelHistory).
//!
//! - **Grouping**: flat number rows into draw events
//! - **Frequency**: absolute frequency and current delay over the full history
//! - **Window**: short-window frequency, hot and cold numbers
//! - **Patterns**: twins and consecutive pairs in the latest draw

pub mod helpers;

pub mod frequency;
pub mod grouping;
pub mod patterns;
pub mod window;

pub use frequency::*;
pub use grouping::*;
pub use helpers::*;
pub use patterns::*;
pub use window::*;
