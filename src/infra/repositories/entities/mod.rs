//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Column names keep the Spanish schema; field names are English.

pub mod courier;
pub mod establishment;
pub mod establishment_type;
pub mod product;
pub mod user;
