//! API client - HTTP test client and error-response classifier
//!
//! Thin async request builders over a shared base address (JSON, form and
//! multipart bodies, `{name}` path parameters) plus a classifier that turns
//! error responses into categories and extracted payload fields.

pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod path;
pub mod pet;
pub mod response;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use classifier::{ErrorCategory, ErrorClassification, ErrorClassifier, ErrorClassifierImpl};
pub use client::{plan_multipart, ApiClient, PartValue, PlannedPart, FILE_NOT_AVAILABLE};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use path::PathParams;
pub use pet::{Category, Pet, PetApiClient, PetStatus, Tag};
pub use response::ApiResponse;
