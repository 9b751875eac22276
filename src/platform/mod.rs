//! Platform layer
//!
//! The simulation is host-agnostic. On wasm32 the browser drives it through
//! `WebRunner`; natively the binary in `main.rs` does.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebRunner;
