use crate::domain::model::Candidate;
use crate::domain::ports::{CandidateStore, ConfigProvider};
use crate::utils::error::{RegistryError, Result};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Pretty-printed JSON array on local disk.
///
/// Writes go straight to the target file: there is no temp file or rename, so
/// a crash during a write can leave a truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
}

impl JsonFileStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.candidates_path().map(PathBuf::from))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn encode(candidates: &[Candidate]) -> Result<Vec<u8>> {
        let values = candidates
            .iter()
            .map(without_nulls)
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::to_vec_pretty(&values)?)
    }
}

fn without_nulls(candidate: &Candidate) -> Result<Value> {
    let mut value = serde_json::to_value(candidate)?;
    if let Value::Object(fields) = &mut value {
        fields.retain(|_, v| !v.is_null());
    }
    Ok(value)
}

impl CandidateStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Candidate>> {
        let Some(path) = &self.path else {
            tracing::warn!("Candidates path not configured, starting with an empty registry");
            return Ok(Vec::new());
        };

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No candidates file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let candidates: Vec<Candidate> = serde_json::from_slice(&data)?;
        tracing::info!(
            path = %path.display(),
            count = candidates.len(),
            "Loaded candidates from file"
        );
        Ok(candidates)
    }

    async fn save(&self, candidates: &[Candidate]) -> Result<()> {
        let path = self.path.as_ref().ok_or_else(|| RegistryError::MissingConfigError {
            field: "storage.candidates_path".to_string(),
        })?;

        let data = Self::encode(candidates)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(path, data).await?;
        Ok(())
    }

    fn location(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "<unconfigured>".to_string(),
        }
    }
}
