use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};
use crate::models::domain::{
    Address, BedAvailability, Contact, FacilityType, Insurance, SearchFilters, Service, SortKey,
};

/// Request to search the directory
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(default)]
    pub filters: SearchFilters,
    /// Free-text reference location, geocoded when `filters.coordinates` is absent
    #[serde(default)]
    pub location: Option<String>,
    /// Structured reference address, used when no free-text location is given
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(alias = "sort_by", rename = "sortBy", default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub offset: usize,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Create or replace a facility record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FacilityRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    #[serde(rename = "type")]
    pub facility_types: Vec<FacilityType>,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub fax: String,
    #[validate(custom(function = "validate_contact"))]
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(default)]
    pub insurances: Vec<Insurance>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(rename = "bedAvailability", default)]
    pub bed_availability: BedAvailability,
}

fn validate_contact(contact: &Contact) -> Result<(), ValidationError> {
    if !contact.email.is_empty() && !contact.email.validate_email() {
        return Err(ValidationError::new("contact_email"));
    }
    Ok(())
}

/// Administrator sign-in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility_request() -> FacilityRequest {
        FacilityRequest {
            name: "Harbor View".to_string(),
            facility_types: vec![FacilityType::SkilledNursing],
            location: "12 Water St, Providence, RI 02903".to_string(),
            phone: String::new(),
            fax: String::new(),
            contact: None,
            image_url: String::new(),
            insurances: vec![],
            services: vec![],
            bed_availability: BedAvailability::Unknown,
        }
    }

    #[test]
    fn test_facility_request_requires_type() {
        let mut req = facility_request();
        assert!(req.validate().is_ok());

        req.facility_types.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_contact_email_checked() {
        let mut req = facility_request();
        req.contact = Some(Contact {
            name: "Dana".to_string(),
            email: "not-an-email".to_string(),
            phone_ext: "12".to_string(),
        });
        assert!(req.validate().is_err());

        req.contact = Some(Contact {
            name: "Dana".to_string(),
            email: String::new(),
            phone_ext: String::new(),
        });
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_search_request_limit_bounds() {
        let req: SearchRequest = serde_json::from_str(r#"{"sortBy": "distance", "limit": 0}"#).unwrap();
        assert_eq!(req.sort_by, SortKey::Distance);
        assert!(req.validate().is_err());

        let req: SearchRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.sort_by, SortKey::Match);
    }
}
