// Criterion benchmarks for DispoMatch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispomatch::core::{calculate_match_score, haversine_miles, MatchEngine};
use dispomatch::models::{
    BedAvailability, BedRequirement, Coordinates, Facility, FacilityType, Insurance,
    ScoringWeights, SearchFilters, Service, SortKey,
};
use uuid::Uuid;

const PROVIDENCE: Coordinates = Coordinates { lat: 41.824, lng: -71.4128 };

fn create_facility(id: usize, lat: f64, lng: f64) -> Facility {
    let types = FacilityType::ALL;
    let insurances = Insurance::ALL;
    let services = Service::ALL;

    Facility {
        id: Uuid::new_v4(),
        owner_id: None,
        name: format!("Facility {}", id),
        facility_types: vec![types[id % types.len()]],
        location: "Providence, RI".to_string(),
        // Every seventh facility has never been geocoded
        coordinates: (id % 7 != 0).then(|| Coordinates::new(lat, lng)),
        phone: String::new(),
        fax: String::new(),
        contact: None,
        image_url: String::new(),
        insurances: (0..3).map(|k| insurances[(id + k) % insurances.len()]).collect(),
        services: (0..4).map(|k| services[(id + k * 3) % services.len()]).collect(),
        bed_availability: match id % 3 {
            0 => BedAvailability::Yes,
            1 => BedAvailability::No,
            _ => BedAvailability::Unknown,
        },
        created_at: None,
        updated_at: None,
    }
}

fn create_filters() -> SearchFilters {
    SearchFilters {
        facility_name: None,
        facility_types: vec![FacilityType::SkilledNursing, FacilityType::ShortTermRehab],
        insurances: vec![Insurance::Medicaid, Insurance::Medicare],
        services: vec![Service::PhysicalTherapy, Service::OccupationalTherapy],
        available_beds: BedRequirement::Yes,
        coordinates: Some(PROVIDENCE),
        radius: Some(25.0),
    }
}

fn create_directory(count: usize) -> Vec<Facility> {
    (0..count)
        .map(|i| {
            let lat_offset = (i as f64 * 0.003) % 0.6;
            let lng_offset = (i as f64 * 0.002) % 0.6;
            create_facility(i, PROVIDENCE.lat + lat_offset, PROVIDENCE.lng - lng_offset)
        })
        .collect()
}

fn bench_haversine_miles(c: &mut Criterion) {
    let boston = Coordinates::new(42.3601, -71.0589);

    c.bench_function("haversine_miles", |b| {
        b.iter(|| haversine_miles(black_box(PROVIDENCE), black_box(boston)));
    });
}

fn bench_scoring(c: &mut Criterion) {
    let facility = create_facility(1, 41.83, -71.41);
    let filters = create_filters();
    let weights = ScoringWeights::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| calculate_match_score(black_box(&facility), black_box(&filters), &weights));
    });
}

fn bench_search(c: &mut Criterion) {
    let engine = MatchEngine::with_default_weights();
    let filters = create_filters();

    let mut group = c.benchmark_group("search");

    for facility_count in [10, 50, 100, 500, 1000].iter() {
        let facilities = create_directory(*facility_count);

        for sort_key in [SortKey::Match, SortKey::Distance] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", sort_key), facility_count),
                facility_count,
                |b, _| {
                    b.iter(|| engine.search(black_box(&facilities), black_box(&filters), sort_key));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_haversine_miles, bench_scoring, bench_search);

criterion_main!(benches);
