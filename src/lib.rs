// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # graph-pager
//!
//! Client library for paginated Graph-style REST APIs.
//!
//! ## Features
//!
//! - **Response Envelope**: Status, headers, and a JSON body decoded once on first use
//! - **Typed Entities**: Project bodies and collection items onto serde models
//! - **Page Iterator**: Follow `@odata.nextLink` with pause and resume
//! - **Delta Links**: Keep the `@odata.deltaLink` of the last page for change polling
//! - **Pluggable Transport**: reqwest by default, or any `tower::Service`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graph_pager::{Client, ClientConfig, GraphClient, PageIterator, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(Client::new(ClientConfig::default())?.with_access_token("..."));
//!     let first = client.get("/users").await?;
//!
//!     let mut users = PageIterator::new(Arc::clone(&client), first, |user: serde_json::Value| {
//!         println!("{}", user["displayName"]);
//!         true
//!     })?;
//!
//!     users.iterate().await?;
//!     println!("delta link: {:?}", users.delta_link());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      PageIterator                        │
//! │  iterate() / resume() → callback(item) per item, by page │
//! └──────────────────────────────────────────────────────────┘
//!              │                               │
//! ┌────────────┴───────────┐   ┌───────────────┴──────────────┐
//! │      GraphClient       │   │      CollectionResponse      │
//! │ create_request / send  │   │ value, nextLink, deltaLink   │
//! └────────────┬───────────┘   └───────────────┬──────────────┘
//!              │                               │
//! ┌────────────┴───────────┐   ┌───────────────┴──────────────┐
//! │     HttpTransport      │   │        GraphResponse         │
//! │ reqwest | tower::Service │   │ status, headers, lazy body   │
//! └────────────────────────┘   └──────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document error enum variants, then drop this allow

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Request types and transports
pub mod http;

/// Response envelopes
pub mod response;

/// Client facade
pub mod client;

/// Page iteration
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{Client, GraphClient};
pub use config::ClientConfig;
pub use http::{GraphRequest, HttpTransport, RawResponse, RequestOptions};
pub use pagination::{CallbackResult, IterationSignal, IteratorState, PageIterator};
pub use response::{CollectionResponse, Entity, GraphResponse};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
