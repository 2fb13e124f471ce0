//! Response module
//!
//! Wrappers around raw responses.
//!
//! # Overview
//!
//! - `GraphResponse` - Status, headers, and a JSON body decoded once on first use
//! - `CollectionResponse` - A response known to carry a `value` array plus
//!   optional `@odata.nextLink` / `@odata.deltaLink`
//! - `Entity` - Typed projection of a body onto a model type

mod collection;
mod entity;
mod envelope;

pub use collection::CollectionResponse;
pub use entity::{deserialize_entity, Entity};
pub use envelope::GraphResponse;
