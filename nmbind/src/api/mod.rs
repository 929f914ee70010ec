//! Public API module.
//!
//! The root [`NetworkManager`](network_manager::NetworkManager) handle and the
//! plain data types returned by the wrappers.

pub mod models;
pub mod network_manager;
