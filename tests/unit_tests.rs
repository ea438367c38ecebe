// Unit tests for DispoMatch

use dispomatch::core::{
    distance::{distance, haversine_miles, is_within_radius},
    filters::{matches_name, matches_radius, passes_hard_filters},
    scoring::calculate_match_score,
};
use dispomatch::models::{
    BedAvailability, BedRequirement, Coordinates, Facility, FacilityType, Insurance,
    ScoringWeights, SearchFilters, Service,
};
use uuid::Uuid;

const PROVIDENCE: Coordinates = Coordinates { lat: 41.824, lng: -71.4128 };
const BOSTON: Coordinates = Coordinates { lat: 42.3601, lng: -71.0589 };

fn facility(name: &str) -> Facility {
    Facility {
        id: Uuid::new_v4(),
        owner_id: None,
        name: name.to_string(),
        facility_types: vec![FacilityType::SkilledNursing],
        location: "Providence, RI".to_string(),
        coordinates: Some(PROVIDENCE),
        phone: String::new(),
        fax: String::new(),
        contact: None,
        image_url: String::new(),
        insurances: vec![Insurance::Medicaid, Insurance::Medicare],
        services: vec![Service::PhysicalTherapy],
        bed_availability: BedAvailability::Yes,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn test_haversine_zero_for_same_point() {
    assert_eq!(haversine_miles(PROVIDENCE, PROVIDENCE), 0.0);
}

#[test]
fn test_haversine_providence_to_boston() {
    // Roughly 41 miles as the crow flies
    let miles = haversine_miles(PROVIDENCE, BOSTON);
    assert!(miles > 38.0 && miles < 44.0, "got {}", miles);
}

#[test]
fn test_unknown_distance_is_not_zero() {
    assert_eq!(distance(Some(PROVIDENCE), None), None);
    assert_eq!(distance(None, Some(BOSTON)), None);
    assert!(distance(Some(PROVIDENCE), Some(PROVIDENCE)).is_some());
}

#[test]
fn test_radius_check_requires_known_point() {
    assert!(is_within_radius(PROVIDENCE, Some(PROVIDENCE), 0.0));
    assert!(!is_within_radius(PROVIDENCE, None, 1000.0));
    assert!(!is_within_radius(PROVIDENCE, Some(BOSTON), 25.0));
    assert!(is_within_radius(PROVIDENCE, Some(BOSTON), 50.0));
}

#[test]
fn test_name_filter_is_case_insensitive_substring() {
    let f = facility("Harborview Skilled Nursing");

    let filters = SearchFilters {
        facility_name: Some("HARBOR".to_string()),
        ..Default::default()
    };
    assert!(matches_name(&f, &filters));

    let filters = SearchFilters {
        facility_name: Some("Bayside".to_string()),
        ..Default::default()
    };
    assert!(!matches_name(&f, &filters));
}

#[test]
fn test_blank_name_filter_is_inactive() {
    let f = facility("Harborview");
    let filters = SearchFilters {
        facility_name: Some("   ".to_string()),
        ..Default::default()
    };

    assert!(matches_name(&f, &filters));
    assert_eq!(calculate_match_score(&f, &filters, &ScoringWeights::default()), 100);
}

#[test]
fn test_radius_without_reference_point_is_ignored() {
    let mut f = facility("Harborview");
    f.coordinates = None;

    let filters = SearchFilters {
        radius: Some(5.0),
        ..Default::default()
    };

    assert!(matches_radius(&f, &filters));
    assert!(passes_hard_filters(&f, &filters));
}

#[test]
fn test_missing_coordinates_excluded_when_radius_active() {
    let mut f = facility("Harborview");
    f.coordinates = None;

    let filters = SearchFilters {
        coordinates: Some(PROVIDENCE),
        radius: Some(5.0),
        ..Default::default()
    };

    assert!(!passes_hard_filters(&f, &filters));
}

#[test]
fn test_score_is_always_within_bounds() {
    let weights = ScoringWeights::default();
    let f = facility("Harborview");

    let filter_sets = [
        SearchFilters::default(),
        SearchFilters {
            facility_types: vec![FacilityType::Hospice],
            ..Default::default()
        },
        SearchFilters {
            insurances: vec![Insurance::Aetna, Insurance::Medicaid, Insurance::Cigna],
            services: vec![Service::PhysicalTherapy, Service::MemoryCare],
            available_beds: BedRequirement::No,
            ..Default::default()
        },
    ];

    for filters in &filter_sets {
        let score = calculate_match_score(&f, filters, &weights);
        assert!(score <= 100);
    }
}

#[test]
fn test_partial_insurance_credit() {
    let f = facility("Harborview");
    let filters = SearchFilters {
        insurances: vec![
            Insurance::Medicaid,
            Insurance::Aetna,
            Insurance::Cigna,
            Insurance::Oscar,
        ],
        ..Default::default()
    };

    // 1 of 4 requested plans accepted
    assert_eq!(calculate_match_score(&f, &filters, &ScoringWeights::default()), 25);
}

#[test]
fn test_bed_requirement_any_is_inactive() {
    let mut f = facility("Harborview");
    f.bed_availability = BedAvailability::No;

    let filters = SearchFilters {
        available_beds: BedRequirement::Any,
        insurances: vec![Insurance::Medicaid],
        ..Default::default()
    };

    assert_eq!(calculate_match_score(&f, &filters, &ScoringWeights::default()), 100);
}

#[test]
fn test_bed_requirement_no_matches_full_facility() {
    let mut f = facility("Harborview");
    f.bed_availability = BedAvailability::No;

    let filters = SearchFilters {
        available_beds: BedRequirement::No,
        ..Default::default()
    };

    assert_eq!(calculate_match_score(&f, &filters, &ScoringWeights::default()), 100);
}

#[test]
fn test_heavier_dimension_dominates() {
    let f = facility("Harborview");
    let filters = SearchFilters {
        facility_types: vec![FacilityType::Hospice],
        insurances: vec![Insurance::Medicaid],
        ..Default::default()
    };

    let weights = ScoringWeights {
        insurance: 3.0,
        ..Default::default()
    };

    // Insurance matches (3), type does not (1): 3 / 4
    assert_eq!(calculate_match_score(&f, &filters, &weights), 75);
}
