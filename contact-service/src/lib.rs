//! Contact intake backend for the company website.
//!
//! Accepts contact form submissions, screens them with a honeypot field and
//! stores them in a document store when one is configured. Also serves the
//! health, storage probe, robots and sitemap endpoints.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use startup::{build_router, AppState, Application};
