//! Application constants.

/// Channel buffer size for background completions.
pub const MESSAGE_CHANNEL_SIZE: usize = 256;

/// Event loop tick interval in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 50;

/// Lines scrolled per PageUp/PageDown in the dry-run view.
pub const PLAN_SCROLL_PAGE: usize = 10;
