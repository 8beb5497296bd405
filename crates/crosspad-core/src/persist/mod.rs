//! Mixer state persistence
//!
//! Saves routing, channel levels and output levels (never peaks) to a
//! JSON or YAML file and restores them at startup.
//!
//! ```ignore
//! use crosspad_core::persist::{load_state, save_state};
//!
//! load_state(engine.state(), &path);
//! // ... user changes routing ...
//! save_state(engine.state(), &path);
//! ```

mod document;
mod error;
mod format;
mod store;

pub use document::{ChannelEntry, MixerDocument, OutputEntry, RouteEntry};
pub use error::{StateError, StateResult};
pub use format::StateFormat;
pub use store::{load_state, read_document, save_state, try_save_state, LoadOutcome};
