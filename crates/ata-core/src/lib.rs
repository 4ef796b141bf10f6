pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::AtaConfig;
pub use error::{AtaError, Result};
pub use events::AssistantEvent;
pub use types::*;
