#![doc(test(attr(deny(warnings))))]

//! Finance Core provides the recurring-entry planner, credit-card billing
//! engine, and monthly reconciliation primitives behind personal-finance
//! frontends.

pub mod config;
pub mod core;
pub mod domain;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}
