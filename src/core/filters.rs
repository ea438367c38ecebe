use crate::core::{distance::is_within_radius, scoring::name_contains};
use crate::models::{Facility, SearchFilters};
use thiserror::Error;
use uuid::Uuid;

/// Input that breaks the engine's contract.
///
/// Missing coordinates or empty tag sets are not errors; these are.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("reference coordinates out of range: lat {lat}, lng {lng}")]
    InvalidReference { lat: f64, lng: f64 },

    #[error("search radius must be a non-negative number of miles, got {0}")]
    InvalidRadius(f64),

    #[error("facility {id} has coordinates out of range: lat {lat}, lng {lng}")]
    InvalidFacilityCoordinates { id: Uuid, lat: f64, lng: f64 },
}

impl MatchError {
    /// True when the fault lies in stored facility data rather than in the request
    pub fn is_stored_data(&self) -> bool {
        matches!(self, MatchError::InvalidFacilityCoordinates { .. })
    }
}

/// Reject filters whose reference point or radius cannot be measured against
pub fn validate_filters(filters: &SearchFilters) -> Result<(), MatchError> {
    if let Some(origin) = filters.coordinates {
        if !origin.is_valid() {
            return Err(MatchError::InvalidReference {
                lat: origin.lat,
                lng: origin.lng,
            });
        }
    }

    if let Some(radius) = filters.radius {
        if !radius.is_finite() || radius < 0.0 {
            return Err(MatchError::InvalidRadius(radius));
        }
    }

    Ok(())
}

/// Reject a facility whose stored coordinates are not a real point
pub fn validate_facility(facility: &Facility) -> Result<(), MatchError> {
    match facility.coordinates {
        Some(point) if !point.is_valid() => Err(MatchError::InvalidFacilityCoordinates {
            id: facility.id,
            lat: point.lat,
            lng: point.lng,
        }),
        _ => Ok(()),
    }
}

/// Name filter as a hard exclude: a facility whose name does not contain the
/// query never appears, whatever its other credits.
#[inline]
pub fn matches_name(facility: &Facility, filters: &SearchFilters) -> bool {
    filters
        .name_query()
        .map_or(true, |query| name_contains(&facility.name, query))
}

/// Radius filter as a hard exclude.
///
/// Facilities without coordinates cannot be shown to be inside the radius and
/// are excluded while a radius is active.
#[inline]
pub fn matches_radius(facility: &Facility, filters: &SearchFilters) -> bool {
    match filters.active_radius() {
        Some((origin, radius)) => is_within_radius(origin, facility.coordinates, radius),
        None => true,
    }
}

/// All hard excludes together
#[inline]
pub fn passes_hard_filters(facility: &Facility, filters: &SearchFilters) -> bool {
    matches_name(facility, filters) && matches_radius(facility, filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BedAvailability, Coordinates, FacilityType};

    fn create_test_facility(name: &str, coordinates: Option<Coordinates>) -> Facility {
        Facility {
            id: Uuid::new_v4(),
            owner_id: None,
            name: name.to_string(),
            facility_types: vec![FacilityType::AssistedLiving],
            location: "Cranston, RI".to_string(),
            coordinates,
            phone: String::new(),
            fax: String::new(),
            contact: None,
            image_url: String::new(),
            insurances: vec![],
            services: vec![],
            bed_availability: BedAvailability::Unknown,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_name_filter_excludes_mismatch() {
        let facility = create_test_facility("Oakwood Assisted Living", None);
        let filters = SearchFilters {
            facility_name: Some("OAKWOOD".to_string()),
            ..Default::default()
        };
        assert!(matches_name(&facility, &filters));

        let filters = SearchFilters {
            facility_name: Some("Maple".to_string()),
            ..Default::default()
        };
        assert!(!matches_name(&facility, &filters));
    }

    #[test]
    fn test_name_filter_is_not_trimmed() {
        let filters = SearchFilters {
            facility_name: Some("View ".to_string()),
            ..Default::default()
        };

        assert!(!matches_name(&create_test_facility("Harbor View", None), &filters));
        assert!(matches_name(&create_test_facility("Harbor View Manor", None), &filters));
    }

    #[test]
    fn test_radius_requires_reference() {
        let facility = create_test_facility("Oakwood", None);
        let filters = SearchFilters {
            radius: Some(5.0),
            ..Default::default()
        };

        // radius without a reference point is inert
        assert!(matches_radius(&facility, &filters));
    }

    #[test]
    fn test_radius_excludes_unknown_coordinates() {
        let facility = create_test_facility("Oakwood", None);
        let filters = SearchFilters {
            coordinates: Some(Coordinates::new(41.8, -71.4)),
            radius: Some(5.0),
            ..Default::default()
        };

        assert!(!matches_radius(&facility, &filters));
    }

    #[test]
    fn test_validate_filters() {
        let filters = SearchFilters {
            coordinates: Some(Coordinates::new(41.8, -71.4)),
            radius: Some(25.0),
            ..Default::default()
        };
        assert!(validate_filters(&filters).is_ok());

        let filters = SearchFilters {
            radius: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(validate_filters(&filters), Err(MatchError::InvalidRadius(-1.0)));
        assert!(!MatchError::InvalidRadius(-1.0).is_stored_data());

        let filters = SearchFilters {
            coordinates: Some(Coordinates::new(120.0, 0.0)),
            ..Default::default()
        };
        assert!(matches!(
            validate_filters(&filters),
            Err(MatchError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_validate_facility_coordinates() {
        let ok = create_test_facility("Oakwood", Some(Coordinates::new(41.8, -71.4)));
        assert!(validate_facility(&ok).is_ok());

        let bad = create_test_facility("Oakwood", Some(Coordinates::new(0.0, 200.0)));
        assert!(validate_facility(&bad).is_err());
    }
}
