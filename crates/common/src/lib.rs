//! Shared wire types and error helpers used across the voira crates.

pub mod error;
pub mod types;

pub use {
    error::FromMessage,
    types::{PhoneNumbers, ScrapedData},
};
