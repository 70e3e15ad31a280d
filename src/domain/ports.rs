use crate::domain::model::Candidate;
use crate::utils::error::Result;

/// Where candidate snapshots are loaded from and written to.
pub trait CandidateStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Vec<Candidate>>> + Send;
    fn save(&self, candidates: &[Candidate])
        -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human readable destination, used in log messages.
    fn location(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn candidates_path(&self) -> Option<&str>;
}
