//! Contact Desk — contact-form backend for a static marketing site.

pub mod config;
pub mod contact;
pub mod error;
pub mod server;
