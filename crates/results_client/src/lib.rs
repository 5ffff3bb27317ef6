//! HTTP implementation of the quiz results sink.

pub mod client;

pub use client::HttpResultsSink;
