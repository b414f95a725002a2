//! Platform entry points: settings parsing, logging setup and app startup

pub mod cli;
pub mod logging;

#[cfg(not(target_arch = "wasm32"))]
pub mod run;

#[cfg(target_arch = "wasm32")]
pub mod web;
