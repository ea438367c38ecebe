use crate::models::{Facility, ScoringWeights, SearchFilters};

/// A filter dimension that can contribute to a facility's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    FacilityType,
    Insurance,
    Service,
    BedAvailability,
    Name,
}

impl Dimension {
    /// Configured relative weight for this dimension
    #[inline]
    pub fn weight(&self, weights: &ScoringWeights) -> f64 {
        match self {
            Dimension::FacilityType => weights.facility_type,
            Dimension::Insurance => weights.insurance,
            Dimension::Service => weights.service,
            Dimension::BedAvailability => weights.bed_availability,
            Dimension::Name => weights.name,
        }
    }
}

/// Credit earned on one dimension, in `[0, 1]`.
///
/// `None` means the filters leave the dimension inactive, so it takes no share
/// of the total.
pub type Rule = fn(&Facility, &SearchFilters) -> Option<f64>;

/// Every scored dimension and its rule. Adding a dimension means adding a row
/// here and a weight in `ScoringWeights`.
pub const DIMENSIONS: &[(Dimension, Rule)] = &[
    (Dimension::FacilityType, facility_type_credit),
    (Dimension::Insurance, insurance_credit),
    (Dimension::Service, service_credit),
    (Dimension::BedAvailability, bed_availability_credit),
    (Dimension::Name, name_credit),
];

/// Calculate a match percentage (0-100) for a facility
///
/// Scoring formula:
/// score = round(100 * Σ(credit_i * w_i) / Σ(w_i)) over active dimensions
///
/// With default weights every active dimension is worth `100 / active` points.
/// A search with no active dimension scores every facility 100.
pub fn calculate_match_score(
    facility: &Facility,
    filters: &SearchFilters,
    weights: &ScoringWeights,
) -> u8 {
    let mut total_weight = 0.0;
    let mut matched_weight = 0.0;

    for (dimension, rule) in DIMENSIONS {
        if let Some(credit) = rule(facility, filters) {
            let weight = dimension.weight(weights);
            total_weight += weight;
            matched_weight += credit * weight;
        }
    }

    if total_weight <= 0.0 {
        return 100;
    }

    (100.0 * matched_weight / total_weight).round().clamp(0.0, 100.0) as u8
}

/// Facility type: full credit when any requested type is offered
#[inline]
fn facility_type_credit(facility: &Facility, filters: &SearchFilters) -> Option<f64> {
    if filters.facility_types.is_empty() {
        return None;
    }

    let any_overlap = filters
        .facility_types
        .iter()
        .any(|wanted| facility.facility_types.contains(wanted));

    Some(if any_overlap { 1.0 } else { 0.0 })
}

/// Insurance: share of requested plans the facility accepts
#[inline]
fn insurance_credit(facility: &Facility, filters: &SearchFilters) -> Option<f64> {
    overlap_fraction(&filters.insurances, &facility.insurances)
}

/// Services: share of requested services the facility offers
#[inline]
fn service_credit(facility: &Facility, filters: &SearchFilters) -> Option<f64> {
    overlap_fraction(&filters.services, &facility.services)
}

/// Beds: exact match on yes/no, `unknown` never satisfies a request
#[inline]
fn bed_availability_credit(facility: &Facility, filters: &SearchFilters) -> Option<f64> {
    let wanted = filters.available_beds.wanted()?;
    Some(if facility.bed_availability == wanted { 1.0 } else { 0.0 })
}

/// Name: case-insensitive substring match
#[inline]
fn name_credit(facility: &Facility, filters: &SearchFilters) -> Option<f64> {
    let query = filters.name_query()?;
    Some(if name_contains(&facility.name, query) { 1.0 } else { 0.0 })
}

/// Case-insensitive substring test used by both scoring and exclusion
#[inline]
pub fn name_contains(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

#[inline]
fn overlap_fraction<T: PartialEq>(requested: &[T], offered: &[T]) -> Option<f64> {
    if requested.is_empty() {
        return None;
    }

    let matched = requested.iter().filter(|tag| offered.contains(tag)).count();
    Some(matched as f64 / requested.len() as f64)
}
