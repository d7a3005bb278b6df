//! HTTP submission endpoint module

mod client;

pub use client::HttpEndpoint;
