//! Orbit core — everything that does not touch the browser.
//!
//! Platform adapters implement the traits in [`ports`]; the app crate wires
//! them into a [`runtime::ChatRuntime`] sharing one [`session_store::SessionStore`].

pub mod attachment;
pub mod event_bus;
pub mod persistence;
pub mod ports;
pub mod runtime;
pub mod session_store;
