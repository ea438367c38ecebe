// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use distance::{distance, haversine_miles, is_within_radius};
pub use filters::{matches_name, matches_radius, passes_hard_filters, MatchError};
pub use matcher::{sort_results, MatchEngine};
pub use scoring::{calculate_match_score, Dimension, DIMENSIONS};
