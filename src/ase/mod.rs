//! **ASE** (Sybase / SAP Adaptive Server Enterprise) client adapter.
//!
//! Binds the generic [`SqlExecutor`][crate::executor::SqlExecutor]
//! abstraction to the ASE driver and relays server informational messages.

mod client;
mod connection;
mod factory;
mod message;
mod options;

pub use client::{AseClient, AseClientBuilder};
pub use connection::{AseCapabilities, AseConnection};
pub use factory::AseClientFactory;
pub use message::{AseInfoMessage, InfoMessageHandler};
pub use options::AseConnectOptions;
