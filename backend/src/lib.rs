//! Signed URL issuance service for direct-to-bucket uploads

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Issuance endpoint and CORS policy
pub mod issuance;

/// Storage keys and S3 URL signing
pub mod media_storage;

/// HTTP routes
pub mod routes;

/// HTTP server
pub mod server;

/// Environment configuration and error responses
pub mod types;
