pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::JsonFileStore;
pub use config::RegistryConfig;
pub use crate::core::registry::CandidateRegistry;
pub use domain::model::{Candidate, CandidatePatch};
pub use utils::error::{RegistryError, Result};
