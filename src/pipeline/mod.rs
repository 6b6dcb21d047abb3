//! Document summarization pipeline: cleaning, chunking, and fallback orchestration.

pub mod chunk;
pub mod clean;
pub mod extractive;
mod service;
pub mod types;

pub use service::{SummaryApi, SummaryService};
pub use types::{
    PipelineError, SummarizeOptions, SummaryMethod, SummaryOutcome, SummaryResult,
};
