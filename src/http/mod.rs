//! HTTP module
//!
//! Request types and the transport boundary.
//!
//! # Features
//!
//! - **Transport Trait**: `HttpTransport` is the only thing the client needs to send
//! - **Reqwest Transport**: Default transport with optional request pacing
//! - **Service Adapter**: Any `tower::Service` can act as a transport
//! - **Request Options**: Extra headers and query parameters merged into requests

mod request;
mod throttle;
mod transport;

pub use request::{GraphRequest, RequestOptions};
pub use throttle::{Throttle, ThrottleConfig};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport, ServiceTransport};
