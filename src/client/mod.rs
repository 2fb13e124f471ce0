//! Client module
//!
//! - `GraphClient` - The capability the page iterator consumes
//! - `Client` - Default implementation over any `HttpTransport`

mod facade;
mod graph;

pub use facade::GraphClient;
pub use graph::Client;

#[cfg(test)]
mod tests;
