//! Account roles and their presentation metadata.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ROLE_CLIENT, ROLE_COURIER, ROLE_ESTABLISHMENT, ROUTE_CLIENT, ROUTE_COURIER,
    ROUTE_ESTABLISHMENT,
};

/// A role an account can hold.
///
/// Keys that the backend does not define are kept as [`Role::Other`] so an
/// inconsistent upstream payload never makes a snapshot unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Client,
    Establishment,
    Courier,
    Other(String),
}

/// Presentation data attached to a known role.
struct RoleInfo {
    key: &'static str,
    label: &'static str,
    route: &'static str,
}

static ROLE_TABLE: [(Role, RoleInfo); 3] = [
    (
        Role::Client,
        RoleInfo {
            key: ROLE_CLIENT,
            label: "Client",
            route: ROUTE_CLIENT,
        },
    ),
    (
        Role::Establishment,
        RoleInfo {
            key: ROLE_ESTABLISHMENT,
            label: "Establishment",
            route: ROUTE_ESTABLISHMENT,
        },
    ),
    (
        Role::Courier,
        RoleInfo {
            key: ROLE_COURIER,
            label: "Courier",
            route: ROUTE_COURIER,
        },
    ),
];

impl Role {
    fn info(&self) -> Option<&'static RoleInfo> {
        ROLE_TABLE
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, info)| info)
    }

    /// Wire key used by the backend (`cliente`, `establecimiento`, `domiciliario`).
    pub fn key(&self) -> &str {
        match self {
            Role::Other(key) => key,
            known => known.info().map_or(ROLE_CLIENT, |info| info.key),
        }
    }

    /// Display label. Unrecognised roles pass through unchanged.
    pub fn label(&self) -> &str {
        match self.info() {
            Some(info) => info.label,
            None => {
                tracing::warn!(role = %self.key(), "No label for unrecognised role");
                self.key()
            }
        }
    }

    /// Landing route. Unrecognised roles land on the client route.
    pub fn home_route(&self) -> &'static str {
        match self.info() {
            Some(info) => info.route,
            None => {
                tracing::warn!(role = %self.key(), "No route for unrecognised role, using client");
                ROUTE_CLIENT
            }
        }
    }

    /// Whether this role is one the backend defines
    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Other(_))
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            ROLE_CLIENT => Role::Client,
            ROLE_ESTABLISHMENT => Role::Establishment,
            ROLE_COURIER => Role::Courier,
            other => Role::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.key().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_round_trip_keys() {
        for key in crate::constants::VALID_ROLES {
            let role = Role::from(*key);
            assert!(role.is_known());
            assert_eq!(role.key(), *key);
        }
    }

    #[test]
    fn test_labels_and_routes() {
        assert_eq!(Role::Client.label(), "Client");
        assert_eq!(Role::Establishment.label(), "Establishment");
        assert_eq!(Role::Courier.label(), "Courier");
        assert_eq!(Role::Client.home_route(), "/cliente");
        assert_eq!(Role::Establishment.home_route(), "/establecimiento");
        assert_eq!(Role::Courier.home_route(), "/domiciliario");
    }

    #[test]
    fn test_unknown_role_passes_through() {
        let role = Role::from("admin");
        assert_eq!(role, Role::Other("admin".to_string()));
        assert_eq!(role.label(), "admin");
        assert_eq!(role.home_route(), "/cliente");
    }

    #[test]
    fn test_serde_uses_wire_keys() {
        let json = serde_json::to_string(&vec![Role::Client, Role::Courier]).unwrap();
        assert_eq!(json, r#"["cliente","domiciliario"]"#);

        let roles: Vec<Role> = serde_json::from_str(r#"["establecimiento","vip"]"#).unwrap();
        assert_eq!(roles, vec![Role::Establishment, Role::Other("vip".into())]);
    }
}
