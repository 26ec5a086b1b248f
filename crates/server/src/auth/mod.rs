//! # Authentication Handlers Module
//!
//! Login and profile endpoints. Password hashing and token issuance live in
//! the `auth` crate; this module only wires them to the users table.

pub mod handlers;
