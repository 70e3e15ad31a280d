//! In-memory candidate registry.
//!
//! Every read and write goes through one exclusive lock. Mutations copy the
//! collection while still holding it, release it, and hand the copy to a
//! background task that writes it through the [`CandidateStore`]. The caller
//! never waits for that write.

use crate::domain::model::{Candidate, CandidatePatch};
use crate::domain::ports::CandidateStore;
use crate::utils::error::{RegistryError, Result};
use crate::utils::validation::{validate_required_argument, Validate};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

pub struct CandidateRegistry<S: CandidateStore + 'static> {
    candidates: Mutex<Vec<Candidate>>,
    store: Arc<S>,
    // dropping a handle detaches its task, so scheduled saves outlive the registry
    pending_saves: Mutex<Vec<JoinHandle<bool>>>,
}

impl<S: CandidateStore + 'static> CandidateRegistry<S> {
    pub fn new(candidates: Vec<Candidate>, store: S) -> Self {
        Self {
            candidates: Mutex::new(candidates),
            store: Arc::new(store),
            pending_saves: Mutex::new(Vec::new()),
        }
    }

    /// Seeds the registry from whatever the store currently holds.
    pub async fn load(store: S) -> Result<Self> {
        let candidates = store.load().await?;
        Ok(Self::new(candidates, store))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // No operation can panic half way through a mutation, so a poisoned lock
    // still guards a consistent collection.
    fn candidates(&self) -> MutexGuard<'_, Vec<Candidate>> {
        self.candidates.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pending_saves(&self) -> MutexGuard<'_, Vec<JoinHandle<bool>>> {
        self.pending_saves.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn list(&self) -> Vec<Candidate> {
        self.candidates().clone()
    }

    pub async fn get(&self, email: &str) -> Option<Candidate> {
        self.candidates()
            .iter()
            .find(|c| c.has_email(email))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.candidates().len()
    }

    pub async fn is_empty(&self) -> bool {
        self.candidates().is_empty()
    }

    /// Returns `Ok(false)` when a candidate with the same email (ignoring
    /// case) is already registered.
    pub async fn add(&self, candidate: Candidate) -> Result<bool> {
        candidate.validate()?;

        let snapshot = {
            let mut candidates = self.candidates();
            if candidates.iter().any(|c| c.has_email(&candidate.email)) {
                tracing::debug!(email = %candidate.email, "Candidate already registered");
                return Ok(false);
            }

            tracing::info!(
                full_name = %candidate.full_name(),
                email = %candidate.email,
                "Added new candidate"
            );
            candidates.push(candidate);
            candidates.clone()
        };

        self.schedule_save(snapshot);
        Ok(true)
    }

    /// Applies `patch` to the first candidate whose email matches. The patch
    /// may change the email itself; later lookups must use the new one.
    pub async fn update(&self, email: &str, patch: CandidatePatch) -> Result<bool> {
        validate_required_argument("email", email)?;
        if patch.is_empty() {
            return Err(RegistryError::invalid_argument(
                "patch",
                "must change at least one field",
            ));
        }

        let snapshot = {
            let mut candidates = self.candidates();
            let Some(candidate) = candidates.iter_mut().find(|c| c.has_email(email)) else {
                tracing::debug!(email, "No candidate to update");
                return Ok(false);
            };

            patch.apply(candidate);
            tracing::info!(email, new_email = %candidate.email, "Updated candidate");
            candidates.clone()
        };

        self.schedule_save(snapshot);
        Ok(true)
    }

    pub async fn remove(&self, email: &str) -> Result<bool> {
        validate_required_argument("email", email)?;

        let snapshot = {
            let mut candidates = self.candidates();
            let Some(index) = candidates.iter().position(|c| c.has_email(email)) else {
                tracing::debug!(email, "No candidate to remove");
                return Ok(false);
            };

            candidates.remove(index);
            tracing::info!(email, "Removed candidate");
            candidates.clone()
        };

        self.schedule_save(snapshot);
        Ok(true)
    }

    /// Case-insensitive substring search over names, email, role, skills and
    /// spoken languages. A blank term returns everything.
    pub async fn search(&self, term: &str) -> Vec<Candidate> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.list().await;
        }

        self.candidates()
            .iter()
            .filter(|c| c.matches(&needle))
            .cloned()
            .collect()
    }

    /// Writes the current collection and waits for the write. Failures are
    /// logged and reported as `false`.
    pub async fn save_snapshot(&self) -> bool {
        let snapshot = self.list().await;
        write_snapshot(self.store.as_ref(), &snapshot).await
    }

    /// Waits for every background save scheduled so far and returns how many
    /// of them succeeded.
    pub async fn flush(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending_saves());

        let mut saved = 0;
        for handle in pending {
            match handle.await {
                Ok(true) => saved += 1,
                Ok(false) => {}
                Err(e) => tracing::error!(error = %e, "Background save task failed"),
            }
        }
        saved
    }

    /// Drains pending saves, then performs one last save of the collection.
    pub async fn shutdown(&self) -> bool {
        self.flush().await;
        self.save_snapshot().await
    }

    fn schedule_save(&self, snapshot: Vec<Candidate>) {
        let store = Arc::clone(&self.store);
        let mut pending = self.pending_saves();

        // reap finished saves so the list does not grow without bound
        pending.retain(|handle| !handle.is_finished());

        pending.push(tokio::spawn(async move {
            write_snapshot(store.as_ref(), &snapshot).await
        }));
    }
}

async fn write_snapshot<S: CandidateStore>(store: &S, snapshot: &[Candidate]) -> bool {
    match store.save(snapshot).await {
        Ok(()) => {
            tracing::info!(
                count = snapshot.len(),
                path = %store.location(),
                "Saved candidates to file"
            );
            true
        }
        Err(RegistryError::MissingConfigError { .. }) => {
            tracing::warn!("Candidates path not configured. Cannot save to file.");
            false
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %store.location(),
                "Error saving candidates to file"
            );
            false
        }
    }
}
