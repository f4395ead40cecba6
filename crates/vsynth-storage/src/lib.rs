//! Cloudflare R2 storage client.
//!
//! This crate provides:
//! - Video upload to R2
//! - Public or presigned URL generation for uploaded objects
//! - Date-partitioned object keys
//! - Connectivity checks

pub mod client;
pub mod error;
pub mod keys;

pub use client::{R2Client, R2Config};
pub use error::{StorageError, StorageResult};
pub use keys::video_key;
