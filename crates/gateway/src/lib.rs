//! # lmscript gateway
//!
//! Outbound access to a portal's REST API: LMv1 request signing, the
//! [`ApiTransport`] seam, the reqwest-backed [`PortalClient`], offset
//! pagination and typed endpoint functions.

pub mod api;
pub mod client;
pub mod mock;
pub mod pagination;
pub mod signing;
pub mod transport;

pub use client::PortalClient;
pub use mock::{MockTransport, RecordedRequest};
pub use pagination::{fetch_all, fetch_all_as};
pub use signing::{RequestSigner, AUTH_SCHEME};
pub use transport::{param, ApiTransport, Query};
