//! User entity.

use chrono::{DateTime, Utc};
use domain::{Role, UserSnapshot};
use uuid::Uuid;

/// Stored account
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    /// Never empty; grows only
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Public view sent to clients
    pub fn to_snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: Some(self.id),
            email: Some(self.email.clone()),
            name: Some(self.name.clone()),
            roles: Some(self.roles.clone()),
            ..Default::default()
        }
    }
}

/// Data required to insert a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn test_snapshot_omits_password_and_active_role() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "hash".into(),
            name: "Ana".into(),
            roles: vec![Role::Client],
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(user.to_snapshot()).unwrap();
        assert_eq!(json["roles"], serde_json::json!(["cliente"]));
        assert!(json.get("rolActivo").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["nombre"], "Ana");
    }
}
