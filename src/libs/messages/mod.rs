//! User-facing text.
//!
//! All console output is expressed as a [`Message`] variant and rendered by
//! its `Display` impl in [`display`]. The `msg_*` macros in [`macros`] decide
//! whether it goes to stdout or through `tracing`.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
