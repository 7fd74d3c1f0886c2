//! Multi-role account as seen by a client session.
//!
//! An account holds one or more roles and exactly one active role. The active
//! role is a local view preference: it selects the landing route and label and
//! is never sent to the server.

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::role::Role;
use crate::wire::{CourierView, EstablishmentView, ProfileResponse, UserSnapshot};

/// Authenticated identity with its role set.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: Uuid,
    email: String,
    name: String,
    roles: Vec<Role>,
    active_role: Role,
    establishment: Option<EstablishmentView>,
    courier: Option<CourierView>,
}

impl Account {
    /// Build an account from a user snapshot.
    ///
    /// Roles fall back to the legacy `rol` field and then to `cliente`;
    /// duplicates are dropped keeping first-seen order. The requested active
    /// role is honoured only when it belongs to the role set.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidSnapshot`] when the id or email is missing.
    pub fn from_snapshot(snapshot: UserSnapshot) -> DomainResult<Self> {
        let id = snapshot
            .id
            .ok_or_else(|| DomainError::invalid_snapshot("missing user id"))?;
        let email = snapshot
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| DomainError::invalid_snapshot("missing email"))?;

        let requested = match snapshot.roles {
            Some(roles) => roles,
            None => snapshot.legacy_role.into_iter().collect(),
        };
        let mut roles: Vec<Role> = Vec::with_capacity(requested.len().max(1));
        for role in requested {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        if roles.is_empty() {
            roles.push(Role::Client);
        }

        let active_role = match snapshot.active_role {
            Some(role) if roles.contains(&role) => role,
            _ => roles[0].clone(),
        };

        let name = snapshot
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.clone());

        Ok(Self {
            id,
            email,
            name,
            roles,
            active_role,
            establishment: snapshot.establishment,
            courier: snapshot.courier,
        })
    }

    /// Parse an account from a serialized snapshot.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let snapshot: UserSnapshot = serde_json::from_str(json)
            .map_err(|e| DomainError::invalid_snapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    /// Build an account from a profile response, carrying the sub-records.
    pub fn from_profile(profile: ProfileResponse) -> DomainResult<Self> {
        let mut snapshot = profile.user;
        snapshot.establishment = profile.establishment;
        snapshot.courier = profile.courier;
        Self::from_snapshot(snapshot)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn active_role(&self) -> &Role {
        &self.active_role
    }

    pub fn establishment(&self) -> Option<&EstablishmentView> {
        self.establishment.as_ref()
    }

    pub fn courier(&self) -> Option<&CourierView> {
        self.courier.as_ref()
    }

    /// Copy of the role set
    pub fn roles(&self) -> Vec<Role> {
        self.roles.clone()
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Display label of the active role
    pub fn active_role_label(&self) -> &str {
        self.active_role.label()
    }

    /// Landing route of the active role
    pub fn home_route(&self) -> &'static str {
        self.active_role.home_route()
    }

    /// Switch the active role. Roles outside the role set are ignored.
    ///
    /// Returns `true` when the switch was applied.
    pub fn set_active_role(&mut self, role: Role) -> bool {
        if !self.roles.contains(&role) {
            tracing::debug!(role = %role, "Ignoring switch to a role the account does not hold");
            return false;
        }
        self.active_role = role;
        true
    }

    /// Snapshot suitable for client-side persistence
    pub fn to_snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: Some(self.id),
            email: Some(self.email.clone()),
            name: Some(self.name.clone()),
            roles: Some(self.roles.clone()),
            legacy_role: None,
            active_role: Some(self.active_role.clone()),
            establishment: self.establishment.clone(),
            courier: self.courier.clone(),
        }
    }
}
