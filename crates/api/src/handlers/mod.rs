//! REST-Handler Module

pub mod admin;
pub mod auth;
pub mod avatar;
pub mod channel;
pub mod chat;
pub mod config;
pub mod info;
pub mod ws;

use serde::Serialize;

/// Einfache Erfolgsantwort `{"success": true, "message": ...}`
#[derive(Debug, Serialize)]
pub struct Erfolg {
    pub success: bool,
    pub message: &'static str,
}

impl Erfolg {
    pub fn neu(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
