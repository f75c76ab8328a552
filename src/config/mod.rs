// src/config/mod.rs

//! Configuration: launcher settings and resolution of the versioned
//! configuration directory.
//!
//! - [`settings`] reads the environment once into [`Settings`].
//! - [`modcache`] knows where a package version lives in the module cache.
//! - [`resolve`] decides which configuration applies and installs it if
//!   needed.

pub mod modcache;
pub mod resolve;
pub mod settings;

pub use modcache::{RULE_FILE, candidate_dir, escape};
pub use resolve::{CUSTOM_VERSION, Resolution, Resolver};
pub use settings::Settings;
