// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Address, BedAvailability, BedRequirement, Contact, Coordinates, Facility, FacilityType,
    Insurance, ScoringWeights, SearchFilters, SearchResult, Service, SortKey, UnknownTag,
};
pub use requests::{FacilityRequest, LoginRequest, SearchRequest};
pub use responses::{
    ErrorResponse, HealthResponse, JobStartedResponse, LoginResponse, OptionsResponse,
    SearchResponse, SessionResponse, RADIUS_OPTIONS,
};
