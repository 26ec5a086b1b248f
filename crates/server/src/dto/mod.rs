//! # Data Transfer Objects Module
//!
//! Request and response types for API endpoints. Inventory and settings
//! DTOs are small enough to live next to their handlers.

pub mod auth;
pub mod dues;
pub mod events;
pub mod expenses;
pub mod users;
