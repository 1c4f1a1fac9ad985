//! Business logic for localbase.
//!
//! Defines the `DocumentStore` trait implemented in `localbase-infra`, the
//! cosine similarity function, the brute-force ranking pipeline behind the
//! search RPC emulation, and the `LocalClient` facade mirroring the remote
//! client's table / delete / rpc ergonomics.

pub mod client;
pub mod search;
pub mod similarity;
pub mod store;
