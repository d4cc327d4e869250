//! Usage decline alerts: find customers whose monthly usage fell sharply
//! and report them per branch in a Thai-calendar notification.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod message;
pub mod notifier;
pub mod period;
pub mod source;
pub mod store;
pub mod types;
