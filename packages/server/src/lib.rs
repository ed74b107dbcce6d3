// Member Directory - API Core
//
// Backend service for registering, finding, updating, and removing directory
// members over a shared document store. The workflow in domains/member is the
// heart of it; kernel holds the store implementations and server the HTTP
// adapter.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
