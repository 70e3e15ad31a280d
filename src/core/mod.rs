pub mod registry;

pub use crate::domain::model::{Candidate, CandidatePatch};
pub use crate::domain::ports::{CandidateStore, ConfigProvider};
pub use crate::utils::error::Result;
