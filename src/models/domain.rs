use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A tag string that is not part of one of the fixed enumerations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} tag: {value:?}")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed set of directory tags.
///
/// Each variant is serialized as its display label, which is also the value
/// stored in the `text[]` columns of the facilities table.
macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every tag in display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownTag {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum! {
    /// Kind of post-acute care a facility provides
    FacilityType, "facility type" {
        SkilledNursing => "Skilled Nursing Facility",
        ShortTermRehab => "Short Term Rehab",
        AssistedLiving => "Assisted Living Facility",
        InpatientRehab => "Inpatient Rehabilitation Unit",
        HomeServices => "Home Services Provider",
        LongTermAcuteCare => "Long Term Acute Care Hospital (LTACH)",
        Hospice => "Hospice",
    }
}

tag_enum! {
    /// Insurance plan accepted by a facility
    Insurance, "insurance" {
        Medicaid => "Medicaid",
        Medicare => "Medicare",
        BlueCrossBlueShield => "Blue Cross & Blue Shield",
        NeighborhoodHealth => "Neighborhood Health",
        UnitedHealthcare => "UnitedHealthcare",
        TuftsHealthPlan => "Tufts Health Plan",
        Aetna => "Aetna",
        HarvardPilgrim => "Harvard Pilgrim",
        Cigna => "Cigna",
        AmeriHealthCaritas => "AmeriHealth Caritas",
        Molina => "Molina",
        Oscar => "Oscar",
        Other => "Other",
    }
}

tag_enum! {
    /// Clinical or support service offered by a facility
    Service, "service" {
        OccupationalTherapy => "OT",
        PhysicalTherapy => "PT",
        SpeechTherapy => "Speech Therapy",
        WoundCare => "Wound Care",
        MedicationAdministration => "Medication Administration",
        IvMedicationAdministration => "IV Medication Administration",
        SocialServices => "Social Services",
        NutritionServices => "Nutrition Services",
        PalliativeHospiceCare => "Palliative & Hospice Care",
        BehavioralHealth => "Behavioral Health",
        MobilityAssistance => "Mobility Assistance",
        AdlAssistance => "ADL Assistance",
        TwentyFourHourNursing => "24-hour Nursing",
        MemoryCare => "Memory Care",
        OxygenTherapy => "Oxygen Therapy",
        Transportation => "Transportation Services & Facility Transfers",
        InterpreterServices => "Interpreter Services",
        CaseManagement => "Case Management",
    }
}

/// Whether a facility currently has open beds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedAvailability {
    Yes,
    No,
    #[default]
    Unknown,
}

impl BedAvailability {
    pub fn as_str(&self) -> &'static str {
        match self {
            BedAvailability::Yes => "yes",
            BedAvailability::No => "no",
            BedAvailability::Unknown => "unknown",
        }
    }

    /// Sort rank: available beds first, unavailable last
    #[inline]
    pub fn rank(&self) -> u8 {
        match self {
            BedAvailability::Yes => 0,
            BedAvailability::Unknown => 1,
            BedAvailability::No => 2,
        }
    }
}

impl std::str::FromStr for BedAvailability {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(BedAvailability::Yes),
            "no" => Ok(BedAvailability::No),
            "unknown" => Ok(BedAvailability::Unknown),
            other => Err(UnknownTag {
                kind: "bed availability",
                value: other.to_string(),
            }),
        }
    }
}

/// Bed availability a searcher asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedRequirement {
    Yes,
    No,
    #[default]
    Any,
}

impl BedRequirement {
    /// The exact facility flag this requirement asks for, if any
    pub fn wanted(&self) -> Option<BedAvailability> {
        match self {
            BedRequirement::Yes => Some(BedAvailability::Yes),
            BedRequirement::No => Some(BedAvailability::No),
            BedRequirement::Any => None,
        }
    }
}

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Postal address used for geocoding a reference location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

impl Address {
    /// Single-line query in the form the geocoder expects
    pub fn to_query(&self) -> String {
        format!("{}, {}, {} {}, USA", self.street, self.city, self.state, self.zip)
    }
}

/// Named contact person at a facility
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "phoneExt", default)]
    pub phone_ext: String,
}

/// Directory entry for a post-acute care facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: Uuid,
    /// Administrator account that manages the entry; read from storage, never sent to clients
    #[serde(rename = "ownerId", default, skip_serializing)]
    pub owner_id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type")]
    pub facility_types: Vec<FacilityType>,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub fax: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    pub insurances: Vec<Insurance>,
    pub services: Vec<Service>,
    #[serde(rename = "bedAvailability", default)]
    pub bed_availability: BedAvailability,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Search criteria supplied by a case manager
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(rename = "facilityName", default)]
    pub facility_name: Option<String>,
    #[serde(rename = "facilityTypes", default)]
    pub facility_types: Vec<FacilityType>,
    #[serde(default)]
    pub insurances: Vec<Insurance>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(rename = "availableBeds", default)]
    pub available_beds: BedRequirement,
    /// Reference point for distance scoring
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// Search radius in miles
    #[serde(default)]
    pub radius: Option<f64>,
}

impl SearchFilters {
    /// Name filter exactly as typed, `None` when absent or all whitespace.
    ///
    /// Surrounding spaces are part of the query: `"View "` matches
    /// "Harbor View Manor" but not "Harbor View".
    pub fn name_query(&self) -> Option<&str> {
        self.facility_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Radius only counts when there is a reference point to measure from
    pub fn active_radius(&self) -> Option<(Coordinates, f64)> {
        match (self.coordinates, self.radius) {
            (Some(origin), Some(radius)) => Some((origin, radius)),
            _ => None,
        }
    }
}

/// Key used to order search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Match,
    BedAvailability,
    Distance,
}

impl SortKey {
    pub const ALL: &'static [SortKey] = &[SortKey::Match, SortKey::BedAvailability, SortKey::Distance];
}

/// Facility annotated with its score for one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub facility: Facility,
    #[serde(rename = "matchPercentage")]
    pub match_percentage: u8,
    /// Miles from the reference point, when both ends are known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Relative weight of each filter dimension
///
/// Only active dimensions share the score, so with the defaults every active
/// dimension is worth the same fraction of 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub facility_type: f64,
    pub insurance: f64,
    pub service: f64,
    pub bed_availability: f64,
    pub name: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            facility_type: 1.0,
            insurance: 1.0,
            service: 1.0,
            bed_availability: 1.0,
            name: 1.0,
        }
    }
}
