//! Data models shared across gstkit.

pub mod config;
pub mod invoice;
pub mod rates;
