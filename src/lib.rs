#![doc(test(attr(deny(warnings))))]

//! Finance Core implements the category and entry forms of a personal finance
//! tracker: a generic resource form controller, the services it talks to, and
//! an in-memory REST backend seeded with sample data.

pub mod cli;
pub mod config;
pub mod controller;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod navigation;
pub mod notify;
pub mod services;
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

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
