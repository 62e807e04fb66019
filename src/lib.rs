#![doc(test(attr(deny(warnings))))]

//! Spendwise records income and expense entries, keeps running totals and
//! monthly expense rollups, and renders them as a table and text charts from
//! an interactive shell.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Spendwise tracing initialized.");
    });
}
