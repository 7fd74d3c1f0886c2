//! Courier profile entity.

use chrono::{DateTime, Utc};
use domain::CourierView;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Courier {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Courier> for CourierView {
    fn from(courier: Courier) -> Self {
        Self {
            id: courier.id,
            status: courier.status,
        }
    }
}
