// Library surface for the scoring engine, aggregate statistics, and the
// local result store. The binary in main.rs is a thin CLI over `store`.
pub mod analytics;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod error;
pub mod runtime;
pub mod session;
pub mod store;
pub mod text;
pub mod time_series;
pub mod util;

pub use error::{Error, Result};
