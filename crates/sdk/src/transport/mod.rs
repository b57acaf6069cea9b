//! Transport layer for the Eka SDK.

mod http;

pub use http::HttpTransport;
