//! JSON payloads exchanged between the API server and its clients.
//!
//! Field names follow the public API (Spanish keys); Rust names are English.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// Loosely-shaped user payload as stored client-side and returned by the API.
///
/// Every field is optional so that partial or legacy snapshots can still be
/// read; [`crate::Account::from_snapshot`] decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "ana@example.com"))]
    pub email: Option<String>,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "Ana"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Vec<String>>, example = json!(["cliente"])))]
    pub roles: Option<Vec<Role>>,
    /// Single-role field accepted from older payloads
    #[serde(rename = "rol", default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub legacy_role: Option<Role>,
    #[serde(rename = "rolActivo", default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub active_role: Option<Role>,
    #[serde(rename = "establecimiento", default, skip_serializing_if = "Option::is_none")]
    pub establishment: Option<EstablishmentView>,
    #[serde(rename = "domiciliario", default, skip_serializing_if = "Option::is_none")]
    pub courier: Option<CourierView>,
}

/// Establishment owned by the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EstablishmentView {
    pub id: Uuid,
    #[serde(rename = "nombre_negocio")]
    pub business_name: String,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "tipo_clave")]
    pub type_key: String,
    #[serde(rename = "tipo_nombre")]
    pub type_name: String,
}

/// Courier profile of the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CourierView {
    pub id: Uuid,
    #[serde(rename = "estado")]
    #[cfg_attr(feature = "openapi", schema(example = "activo"))]
    pub status: String,
}

/// Successful login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: UserSnapshot,
}

/// Response of `GET /api/auth/yo`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProfileResponse {
    #[serde(rename = "usuario")]
    pub user: UserSnapshot,
    #[serde(rename = "establecimiento", default)]
    pub establishment: Option<EstablishmentView>,
    #[serde(rename = "domiciliario", default)]
    pub courier: Option<CourierView>,
}

/// Response of the role-granting endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoleGrantResponse {
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "usuario")]
    pub user: UserSnapshot,
}

/// Selectable establishment category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EstablishmentTypeView {
    pub id: Uuid,
    #[serde(rename = "clave")]
    #[cfg_attr(feature = "openapi", schema(example = "comida"))]
    pub key: String,
    #[serde(rename = "nombre")]
    #[cfg_attr(feature = "openapi", schema(example = "Comida / Restaurante"))]
    pub name: String,
}

/// Product as listed by the catalogue endpoints.
///
/// The establishment fields are only present in the public listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductView {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "precio", default, with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 24900))]
    pub price: Decimal,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
    #[serde(rename = "establecimiento_id", default, skip_serializing_if = "Option::is_none")]
    pub establishment_id: Option<Uuid>,
    #[serde(rename = "establecimiento", default, skip_serializing_if = "Option::is_none")]
    pub establishment_name: Option<String>,
    #[serde(rename = "tipo_nombre", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(rename = "tipo_clave", default, skip_serializing_if = "Option::is_none")]
    pub type_key: Option<String>,
    #[serde(rename = "creado_en")]
    pub created_at: DateTime<Utc>,
}

/// One entry of a payment preference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PreferenceItem {
    #[cfg_attr(feature = "openapi", schema(example = "Combo familiar"))]
    pub title: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 24900))]
    pub unit_price: Decimal,
}

/// Optional buyer information forwarded with a preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Payer {
    pub email: String,
}

/// Body of `POST /api/pagos/preferencia` as sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<Payer>,
}

/// Checkout redirect returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PreferenceResponse {
    #[serde(default)]
    pub url: String,
}

/// Public URL of an uploaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UploadResponse {
    pub url: String,
}

/// Error payload returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    #[serde(rename = "mensaje")]
    #[cfg_attr(feature = "openapi", schema(example = "Ya tienes un negocio registrado"))]
    pub message: String,
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "CONFLICT"))]
    pub code: Option<String>,
}
