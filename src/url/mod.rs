//! URL handling module for Site-Sift
//!
//! This module provides seed normalization and same-origin link resolution.

mod links;
mod normalize;

// Re-export main functions
pub use links::{network_location, same_origin_links, same_origin_links_in};
pub use normalize::normalize_seed;
