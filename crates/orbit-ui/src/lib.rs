//! egui front end for Orbit.
//!
//! Panels render from `UiState` plus read-only views of the session store
//! and hand user intent back to the app as action enums. They never touch
//! storage or the network themselves.

pub mod panels;
pub mod state;
pub mod theme;

#[cfg(test)]
mod tests;
