//! Console output macros.
//!
//! Every user-facing line goes through one of these macros so the output
//! mode is decided in one place:
//!
//! - **Normal mode**: plain `println!`/`eprintln!` with an emoji prefix.
//! - **Debug mode** (`DEVRHYTHM_DEBUG` or `RUST_LOG` set): the same text is
//!   routed through `tracing` so it interleaves with engine diagnostics.
//!
//! The `, true` form pads the message with blank lines.
//!
//! ```rust
//! use devrhythm::{msg_info, msg_warning};
//! use devrhythm::libs::messages::Message;
//!
//! msg_info!(Message::TrackingSuppressed);
//! msg_warning!(Message::TrackingDisabled("two projects".into()), true);
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether console output should be routed through `tracing`.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("DEVRHYTHM_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __msg_emit {
    ($level:ident, $print:ident, $prefix:literal, $msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!("{}{}", $prefix, $msg);
        } else {
            $print!("{}{}", $prefix, $msg);
        }
    };
    ($level:ident, $print:ident, $prefix:literal, $msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!("\n{}{}\n", $prefix, $msg);
        } else {
            $print!("\n{}{}\n", $prefix, $msg);
        }
    };
}

/// Plain message without a prefix.
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "", $msg, true)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "✅ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "✅ ", $msg, true)
    };
}

/// Error to stderr.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", $msg, true)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        $crate::__msg_emit!(warn, println, "⚠️ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(warn, println, "⚠️ ", $msg, true)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", $msg, true)
    };
}

/// Only shown in debug mode.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
