//! # UploadThing Client SDK
//!
//! A client for the UploadThing REST API.
//!
//! ## Features
//!
//! - **Upload grants**: request signed upload URLs with `prepare_upload`
//! - **Direct uploads**: stream a local file to the storage host as a signed multipart form
//! - **File management**: delete, rename and list uploaded files
//! - **Usage**: query stored bytes and limits
//!
//! ## Example
//!
//! ```rust,ignore
//! use utapi_client::{Config, FileRequest, PrepareUploadOpts, UtApi};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = UtApi::new(Config::new("sk_live_..."))?;
//!
//!     // Describe the file and ask for a grant
//!     let file = FileRequest::from_path("abc.pdf").await?;
//!     let grant = client
//!         .prepare_upload(PrepareUploadOpts::single(file).with_route("pdf"))
//!         .await?;
//!
//!     // Send the bytes to storage
//!     client.upload_file(&grant, "abc.pdf").await?;
//!     println!("Uploaded to {}", grant.ufs_url);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod codec;
mod config;
mod error;
mod file;
mod types;
mod upload;

pub mod sniff;

pub use client::{UtApi, API_KEY_HEADER};
pub use codec::{decode, encode};
pub use config::{Config, DEFAULT_HOST, DEFAULT_VERSION};
pub use error::{ClientError, Result};
pub use sniff::detect_content_type;
pub use types::*;
pub use upload::FILE_PART_NAME;

// Re-exported for callers building a shared connection pool
pub use reqwest;
