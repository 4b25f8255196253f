//! Per-service-type form details.
//!
//! The wizard sends `service_specific_data` as a free-form object whose
//! fields depend on the chosen service. [`ServiceDetails::from_form`] reads it
//! against the schema for that service so the calculator only ever sees a
//! typed variant. Unknown fields are ignored.

use crate::config::ServiceType;
use crate::error::ProposalError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentialDetails {
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub home_type: Option<String>,
    pub has_pets: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommercialDetails {
    pub facility_type: Option<String>,
    pub floors: Option<u32>,
    pub restrooms: Option<u32>,
    pub after_hours: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarpetDetails {
    pub carpet_type: Option<String>,
    pub rooms: Option<u32>,
    pub stain_treatment: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDetails {
    pub window_count: u32,
    #[serde(default)]
    pub stories: Option<u32>,
    #[serde(default)]
    pub include_screens: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorDetails {
    pub floor_type: Option<String>,
    pub treatment: Option<String>,
}

/// Service-specific form data, keyed by service type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "service_type", content = "details", rename_all = "snake_case")]
pub enum ServiceDetails {
    Residential(ResidentialDetails),
    Commercial(CommercialDetails),
    Carpet(CarpetDetails),
    Window(WindowDetails),
    Floor(FloorDetails),
}

impl ServiceDetails {
    /// Read the raw form map against the schema of `service_type`.
    ///
    /// # Errors
    /// * [`ProposalError::ServiceDetailsRequired`]: the map is empty
    /// * [`ProposalError::WindowCountRequired`]: window service without a
    ///   positive `window_count`
    /// * [`ProposalError::InvalidServiceDetails`]: a field has the wrong type
    pub fn from_form(
        service_type: ServiceType,
        data: &Map<String, Value>,
    ) -> Result<Self, ProposalError> {
        if data.is_empty() {
            return Err(ProposalError::ServiceDetailsRequired);
        }
        let details = match service_type {
            ServiceType::Residential => Self::Residential(read(service_type, data)?),
            ServiceType::Commercial => Self::Commercial(read(service_type, data)?),
            ServiceType::Carpet => Self::Carpet(read(service_type, data)?),
            ServiceType::Floor => Self::Floor(read(service_type, data)?),
            ServiceType::Window => {
                if matches!(data.get("window_count"), None | Some(Value::Null)) {
                    return Err(ProposalError::WindowCountRequired);
                }
                let window: WindowDetails = read(service_type, data)?;
                if window.window_count == 0 {
                    return Err(ProposalError::WindowCountRequired);
                }
                Self::Window(window)
            }
        };
        Ok(details)
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            Self::Residential(_) => ServiceType::Residential,
            Self::Commercial(_) => ServiceType::Commercial,
            Self::Carpet(_) => ServiceType::Carpet,
            Self::Window(_) => ServiceType::Window,
            Self::Floor(_) => ServiceType::Floor,
        }
    }

    /// Window count for window service, `None` for area-priced services.
    pub fn window_count(&self) -> Option<u32> {
        match self {
            Self::Window(w) => Some(w.window_count),
            _ => None,
        }
    }
}

fn read<T: DeserializeOwned>(
    service_type: ServiceType,
    data: &Map<String, Value>,
) -> Result<T, ProposalError> {
    serde_json::from_value(Value::Object(data.clone())).map_err(|e| {
        ProposalError::InvalidServiceDetails {
            service_type: service_type.to_string(),
            detail: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn reads_window_count() {
        let details =
            ServiceDetails::from_form(ServiceType::Window, &map(json!({"window_count": 50})))
                .unwrap();
        assert_eq!(details.window_count(), Some(50));
        assert_eq!(details.service_type(), ServiceType::Window);
    }

    #[test]
    fn window_without_count_is_rejected() {
        let err = ServiceDetails::from_form(ServiceType::Window, &map(json!({"stories": 2})))
            .unwrap_err();
        assert_eq!(err, ProposalError::WindowCountRequired);

        let err =
            ServiceDetails::from_form(ServiceType::Window, &map(json!({"window_count": 0})))
                .unwrap_err();
        assert_eq!(err, ProposalError::WindowCountRequired);
    }

    #[test]
    fn empty_map_is_rejected() {
        let err = ServiceDetails::from_form(ServiceType::Carpet, &Map::new()).unwrap_err();
        assert_eq!(err, ProposalError::ServiceDetailsRequired);
    }

    #[test]
    fn wrong_field_type_names_the_service() {
        let err = ServiceDetails::from_form(
            ServiceType::Commercial,
            &map(json!({"floors": "three"})),
        )
        .unwrap_err();
        match err {
            ProposalError::InvalidServiceDetails { service_type, .. } => {
                assert_eq!(service_type, "commercial")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let details = ServiceDetails::from_form(
            ServiceType::Residential,
            &map(json!({"bedrooms": 3, "parking_notes": "street"})),
        )
        .unwrap();
        match details {
            ServiceDetails::Residential(r) => assert_eq!(r.bedrooms, Some(3)),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn serializes_as_adjacently_tagged() {
        let details = ServiceDetails::Floor(FloorDetails {
            floor_type: Some("vinyl".into()),
            treatment: None,
        });
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["service_type"], "floor");
        assert_eq!(value["details"]["floor_type"], "vinyl");
    }
}
