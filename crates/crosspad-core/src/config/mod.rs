//! Shared configuration utilities
//!
//! - Generic YAML config loading/saving
//! - Standard file locations
//!
//! # Usage
//!
//! ```ignore
//! use crosspad_core::config::{default_host_config_path, load_config, save_config};
//!
//! let path = default_host_config_path();
//! let config: MyConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod io;
mod paths;

pub use io::{load_config, save_config};
pub use paths::{
    config_dir, default_host_config_path, default_state_path, HOST_CONFIG_FILE_NAME,
    STATE_FILE_NAME,
};
