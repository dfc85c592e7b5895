//! Typed client for the property version endpoints of the Property Manager
//! API (PAPI).
//!
//! # Overview
//! `PapiClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `Session` pairs it
//! with a `Transport` to run the four operations end to end: list versions,
//! latest version, get one version and create a version.
//!
//! # Design
//! - `PapiClient` is stateless; it holds only `base_url` and the
//!   `PAPI-Use-Prefixes` preference.
//! - Each operation is split into `build_*` (validates and produces the
//!   request) and `parse_*` (maps status codes and decodes the body).
//! - `UreqTransport` (feature `ureq`) is the bundled blocking transport.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod location;
pub mod session;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;
pub mod validate;

pub use client::PapiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ProblemDetails};
pub use http::{HttpMethod, HttpRequest, HttpResponse, USE_PREFIXES_HEADER};
pub use session::{Session, Transport};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    ActivationNetwork, CreatePropertyVersionRequest, CreatePropertyVersionResponse,
    GetLatestVersionRequest, GetPropertyVersionRequest, GetPropertyVersionsRequest,
    GetPropertyVersionsResponse, PropertyVersionCreate, PropertyVersionGetItem,
    PropertyVersionItems, VersionStatus,
};
pub use validate::{Validate, ValidationErrors};
