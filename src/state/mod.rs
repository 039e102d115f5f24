//! State module for tracking per-seed crawl progress
//!
//! # Components
//!
//! - `CrawlState`: frontier, visited set and fetch budget of one traversal
//! - `AggregatedResult`: signals merged across the pages of one seed
//! - `SeedStatus` / `SeedReport`: how a seed ended and what it yielded

mod aggregate;
mod crawl_state;
mod seed_status;

// Re-export main types
pub use aggregate::AggregatedResult;
pub use crawl_state::CrawlState;
pub use seed_status::{SeedReport, SeedStatus};
