//! API handlers.
//!
//! Successful responses share one envelope the admin UI unwraps:
//! `{ "success": true, "message": "Bill created successfully", "data": ... }`.

pub mod bills;
pub mod health;
pub mod returns;

use serde::Serialize;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    /// `"{name} fetched successfully"`.
    pub fn fetched(name: &str, data: T) -> Self {
        Self::ok(format!("{name} fetched successfully"), data)
    }

    /// `"{name} created successfully"`.
    pub fn created(name: &str, data: T) -> Self {
        Self::ok(format!("{name} created successfully"), data)
    }

    /// `"{name} updated successfully"`.
    pub fn updated(name: &str, data: T) -> Self {
        Self::ok(format!("{name} updated successfully"), data)
    }

    fn ok(message: String, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}
