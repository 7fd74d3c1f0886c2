//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Role granted to every account on registration
pub const ROLE_CLIENT: &str = "cliente";

/// Role granted after registering a business
pub const ROLE_ESTABLISHMENT: &str = "establecimiento";

/// Role granted after signing up as a courier
pub const ROLE_COURIER: &str = "domiciliario";

/// All recognised role keys
pub const VALID_ROLES: &[&str] = &[ROLE_CLIENT, ROLE_ESTABLISHMENT, ROLE_COURIER];

/// Check if a role key is recognised
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Landing routes
// =============================================================================

pub const ROUTE_CLIENT: &str = "/cliente";
pub const ROUTE_ESTABLISHMENT: &str = "/establecimiento";
pub const ROUTE_COURIER: &str = "/domiciliario";

// =============================================================================
// Establishments
// =============================================================================

/// Establishment type key for restaurants
pub const ESTABLISHMENT_TYPE_FOOD: &str = "comida";

/// Establishment type key for shops selling other goods
pub const ESTABLISHMENT_TYPE_SHOP: &str = "tienda";

/// Establishment type keys accepted on business registration
pub const VALID_ESTABLISHMENT_TYPES: &[&str] = &[ESTABLISHMENT_TYPE_FOOD, ESTABLISHMENT_TYPE_SHOP];

/// Status assigned to new courier profiles
pub const COURIER_STATUS_ACTIVE: &str = "activo";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Payments
// =============================================================================

/// Currency sent with every payment preference item
pub const PAYMENT_CURRENCY: &str = "COP";
