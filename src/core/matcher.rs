use crate::core::{
    distance::distance,
    filters::{matches_name, passes_hard_filters, validate_facility, validate_filters, MatchError},
    scoring::calculate_match_score,
};
use crate::models::{Facility, ScoringWeights, SearchFilters, SearchResult, SortKey};
use std::cmp::Ordering;

/// Search orchestrator - scores, filters and ranks facilities
///
/// # Pipeline Stages
/// 1. Contract checks on filters and facility coordinates
/// 2. Hard excludes (name, radius)
/// 3. Weighted scoring, dropping zero scores
/// 4. Stable sort by the requested key
///
/// The engine borrows its inputs and returns new results; it holds nothing
/// between calls.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    weights: ScoringWeights,
}

impl MatchEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Match percentage for one facility.
    ///
    /// A facility failing the name filter scores 0 outright. The radius
    /// exclude needs a distance and is applied by `search`.
    pub fn score_facility(&self, facility: &Facility, filters: &SearchFilters) -> u8 {
        if !matches_name(facility, filters) {
            return 0;
        }

        calculate_match_score(facility, filters, &self.weights)
    }

    /// Score, filter and sort facilities for a search
    ///
    /// # Arguments
    /// * `facilities` - Already-fetched directory entries
    /// * `filters` - Search criteria, including the optional reference point and radius
    /// * `sort_key` - Result ordering
    ///
    /// # Returns
    /// Every matching facility in order. Paging is left to the caller.
    pub fn search(
        &self,
        facilities: &[Facility],
        filters: &SearchFilters,
        sort_key: SortKey,
    ) -> Result<Vec<SearchResult>, MatchError> {
        validate_filters(filters)?;

        let mut results = Vec::with_capacity(facilities.len());

        for facility in facilities {
            validate_facility(facility)?;

            // Stage 2: hard excludes
            if !passes_hard_filters(facility, filters) {
                continue;
            }

            // Stage 3: scoring
            let match_percentage = calculate_match_score(facility, filters, &self.weights);
            if match_percentage == 0 {
                continue;
            }

            results.push(SearchResult {
                facility: facility.clone(),
                match_percentage,
                distance: distance(filters.coordinates, facility.coordinates),
            });
        }

        // Stage 4: ordering
        sort_results(&mut results, sort_key);

        tracing::debug!(
            "Matched {} of {} facilities (sort: {:?})",
            results.len(),
            facilities.len(),
            sort_key
        );

        Ok(results)
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Stable sort of search results; ties keep input order
pub fn sort_results(results: &mut [SearchResult], sort_key: SortKey) {
    match sort_key {
        SortKey::Match => {
            results.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
        }
        SortKey::BedAvailability => {
            results.sort_by_key(|r| r.facility.bed_availability.rank());
        }
        SortKey::Distance => {
            results.sort_by(|a, b| compare_distance(a.distance, b.distance));
        }
    }
}

/// Ascending distance with unknown distances last
#[inline]
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
