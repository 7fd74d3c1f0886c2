//! Establishment entities.

use chrono::{DateTime, Utc};
use domain::{EstablishmentTypeView, EstablishmentView, VALID_ESTABLISHMENT_TYPES};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Establishment category (`comida`, `tienda`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstablishmentType {
    pub id: Uuid,
    pub key: String,
    pub name: String,
}

impl From<EstablishmentType> for EstablishmentTypeView {
    fn from(t: EstablishmentType) -> Self {
        Self {
            id: t.id,
            key: t.key,
            name: t.name,
        }
    }
}

/// Stored establishment
#[derive(Debug, Clone)]
pub struct Establishment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub type_id: Uuid,
    pub business_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Establishment joined with its category
#[derive(Debug, Clone)]
pub struct EstablishmentDetails {
    pub establishment: Establishment,
    pub kind: EstablishmentType,
}

impl From<EstablishmentDetails> for EstablishmentView {
    fn from(details: EstablishmentDetails) -> Self {
        Self {
            id: details.establishment.id,
            business_name: details.establishment.business_name,
            address: details.establishment.address,
            phone: details.establishment.phone,
            type_key: details.kind.key,
            type_name: details.kind.name,
        }
    }
}

/// Validated business registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEstablishment {
    pub business_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Lowercased category key
    pub type_key: String,
}

impl NewEstablishment {
    /// Trim and check registration fields.
    ///
    /// The category key is matched case-insensitively against the known keys.
    pub fn parse(
        business_name: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
        type_key: Option<&str>,
    ) -> AppResult<Self> {
        let business_name = business_name.map(str::trim).unwrap_or_default();
        if business_name.is_empty() {
            return Err(AppError::validation("El nombre del negocio es obligatorio"));
        }

        let type_key = type_key.map(|k| k.trim().to_lowercase()).unwrap_or_default();
        if !VALID_ESTABLISHMENT_TYPES.contains(&type_key.as_str()) {
            return Err(AppError::validation(
                "Debes elegir el tipo de negocio: comida o tienda (otros productos)",
            ));
        }

        Ok(Self {
            business_name: business_name.to_string(),
            address: trimmed(address),
            phone: trimmed(phone),
            type_key,
        })
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
