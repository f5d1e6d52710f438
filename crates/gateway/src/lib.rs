//! Gateway: HTTP front end and dispatch core.
//!
//! Lifecycle:
//! 1. Load config (address book, endpoints)
//! 2. Build the registry and the live channel dispatchers
//! 3. Serve `/` (notifications), `/health` and the static assets
//!
//! A notification request is answered as soon as its channels have been
//! launched; delivery happens on detached tasks and is only logged.

pub mod registry;
pub mod request;
pub mod resolver;
pub mod response;
pub mod server;
pub mod services;
pub mod state;
