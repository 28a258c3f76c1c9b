//! Core library for certvault: a client for uploading certificates to a
//! remote service and browsing the files it stores.
//!
//! - `api`: HTTP client and the `CertificateApi` trait
//! - `auth`: session store and route authorization
//! - `flows`: login, upload and listing flows with their user-facing messages
//! - `models`: certificate and file types
//! - `config`: base URL, storage location, and paths

pub mod api;
pub mod auth;
pub mod config;
pub mod flows;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, CertificateApi};
pub use auth::{authorize, Route, SessionStore};
pub use config::Config;
