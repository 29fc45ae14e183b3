//! Airfreight quote request: rate-quote form, validation and email delivery.

pub mod config;
pub mod console;
pub mod error;
pub mod notify;
pub mod quote;
