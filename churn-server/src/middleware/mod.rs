//! HTTP middleware

pub mod latency;
