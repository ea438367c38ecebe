//! DispoMatch - search and matching service for post-acute care facilities
//!
//! Case managers search a directory of facilities by type, insurance,
//! services, bed availability and distance; facility administrators keep
//! their own records current. The ranking engine in [`core`] is pure and
//! synchronous; [`services`] holds the storage, geocoding and auth
//! collaborators it is fed from.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchEngine, MatchError, distance::{distance, haversine_miles}};
pub use models::{Facility, SearchFilters, SearchResult, SortKey, ScoringWeights, Coordinates};
