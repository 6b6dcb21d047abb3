#![deny(missing_docs)]

//! Core library for the Precis document summarizer.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF/TXT/MD text extraction.
pub mod extract;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization metrics helpers.
pub mod metrics;
/// Summarization model adapter and lifecycle.
pub mod model;
/// Document summarization pipeline.
pub mod pipeline;
