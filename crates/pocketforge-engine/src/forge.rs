//! The forge engine — session lifecycle and the two-stage pipeline.
//!
//! One active session at a time. A forge run walks
//! `idle → analyzing → generating → ready`; any capability failure lands
//! the session in `error` with the failure recorded in `current_step`.
//! Only sessions that reach `ready` are archived to history, exactly
//! once, at the moment they become ready.

use tracing::{info, instrument, warn};

use pocketforge_core::canonical::RuntimeTarget;
use pocketforge_core::errors::{ForgeError, Result};
use pocketforge_core::session::{Session, SessionStatus};
use pocketforge_core::source::SourceFile;
use pocketforge_llm::{CanonicalizeRequest, GenerateRequest, Reasoner, ReasonerError};

use crate::archive;
use crate::digest::build_digest;
use crate::history::HistoryStore;

/// Map a canonicalizer-call failure into the pipeline error taxonomy.
fn canonicalize_error(err: ReasonerError) -> ForgeError {
    match err {
        ReasonerError::Schema { detail } => ForgeError::CanonicalizationSchema { detail },
        other => capability_error(other),
    }
}

/// Map a generator-call failure into the pipeline error taxonomy.
fn generate_error(err: ReasonerError) -> ForgeError {
    match err {
        ReasonerError::Schema { detail } => ForgeError::GenerationSchema { detail },
        other => capability_error(other),
    }
}

fn capability_error(err: ReasonerError) -> ForgeError {
    let status = match &err {
        ReasonerError::Api { status, .. } => Some(*status),
        ReasonerError::RateLimited { .. } => Some(429),
        _ => None,
    };
    ForgeError::CapabilityUnavailable {
        status,
        detail: err.to_string(),
    }
}

/// Orchestrates sessions over a [`Reasoner`] and a [`HistoryStore`].
pub struct ForgeEngine<R: Reasoner> {
    reasoner: R,
    history: HistoryStore,
    active: Option<Session>,
    digest_cap: usize,
}

impl<R: Reasoner> ForgeEngine<R> {
    /// Create an engine with no active session.
    #[must_use]
    pub fn new(reasoner: R, history: HistoryStore, digest_cap: usize) -> Self {
        Self {
            reasoner,
            history,
            active: None,
            digest_cap,
        }
    }

    /// The active session, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    /// Archived sessions, newest first.
    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Start a fresh idle session, replacing the active one.
    ///
    /// A mid-run session cannot be replaced.
    pub fn new_session(&mut self, name: impl Into<String>) -> Result<&Session> {
        if let Some(active) = &self.active {
            if active.status.is_running() {
                return Err(ForgeError::InvalidState {
                    expected: "no run in flight".to_string(),
                    actual: active.status.to_string(),
                });
            }
        }
        Ok(self.active.insert(Session::new(name)))
    }

    /// Add sources to the active idle session (last-write-wins on path).
    pub fn add_sources(&mut self, files: Vec<SourceFile>) -> Result<()> {
        let session = self.active_idle_mut()?;
        session.add_sources(files);
        Ok(())
    }

    /// Remove one source from the active idle session.
    pub fn remove_source(&mut self, path: &str) -> Result<bool> {
        let session = self.active_idle_mut()?;
        Ok(session.remove_source(path))
    }

    /// Run the full pipeline on the active session.
    ///
    /// Requires an idle active session with at least one source. On
    /// success the session is `ready` and archived; on failure it is
    /// `error` with its sources intact and is not archived.
    #[instrument(skip_all, fields(runtime = %runtime))]
    pub async fn forge(
        &mut self,
        runtime: RuntimeTarget,
        instructions: Option<String>,
    ) -> Result<&Session> {
        let mut session = self.active.take().ok_or_else(no_active)?;
        if session.status != SessionStatus::Idle {
            let err = ForgeError::InvalidState {
                expected: "idle".to_string(),
                actual: session.status.to_string(),
            };
            self.active = Some(session);
            return Err(err);
        }
        if session.sources.is_empty() {
            let err = ForgeError::InvalidState {
                expected: "at least one source".to_string(),
                actual: "empty source set".to_string(),
            };
            self.active = Some(session);
            return Err(err);
        }

        session.status = SessionStatus::Analyzing;
        session.current_step = "analyzing sources".to_string();
        let digest = build_digest(&session.sources, self.digest_cap);

        let canonical = match self
            .reasoner
            .canonicalize(&CanonicalizeRequest {
                digest,
                runtime,
                instructions: instructions.clone(),
            })
            .await
        {
            Ok(canonical) => canonical,
            Err(e) => return Err(self.fail(session, canonicalize_error(e))),
        };
        info!(
            endpoints = canonical.api.endpoints.len(),
            flows = canonical.logic.flows.len(),
            pages = canonical.ui.pages.len(),
            "canonical plan attached"
        );

        session.canonical = Some(canonical.clone());
        session.status = SessionStatus::Generating;
        session.current_step = "generating artifacts".to_string();

        let artifacts = match self
            .reasoner
            .generate_artifacts(&GenerateRequest {
                canonical,
                instructions,
            })
            .await
        {
            Ok(artifacts) if artifacts.is_empty() => {
                // An empty set decodes cleanly but is useless to export.
                let err = ForgeError::GenerationSchema {
                    detail: "empty artifact set".to_string(),
                };
                return Err(self.fail(session, err));
            }
            Ok(artifacts) => artifacts,
            Err(e) => return Err(self.fail(session, generate_error(e))),
        };

        session.artifacts = artifacts;
        session.status = SessionStatus::Ready;
        session.current_step = "ready".to_string();
        info!(
            session = %session.id,
            artifacts = session.artifacts.len(),
            "forge run complete"
        );

        if let Err(e) = self.history.push_front(session.clone()) {
            return Err(self.fail(session, e));
        }
        Ok(self.active.insert(session))
    }

    /// Export the active ready session as a zip.
    pub fn export(&self) -> Result<(String, Vec<u8>)> {
        let session = self.active.as_ref().ok_or_else(no_active)?;
        if session.status != SessionStatus::Ready {
            return Err(ForgeError::InvalidState {
                expected: "ready".to_string(),
                actual: session.status.to_string(),
            });
        }
        archive::export_zip(session)
    }

    /// Reopen an archived session as the active one.
    ///
    /// The session is deep-cloned out of history — edits to the reopened
    /// copy never touch the archived entry.
    pub fn reopen(&mut self, id: &str) -> Result<&Session> {
        if let Some(active) = &self.active {
            if active.status.is_running() {
                return Err(ForgeError::InvalidState {
                    expected: "no run in flight".to_string(),
                    actual: active.status.to_string(),
                });
            }
        }
        let session = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| ForgeError::History(format!("no archived session '{id}'")))?;
        Ok(self.active.insert(session))
    }

    /// Mark the session failed, reinstall it, and pass the error through.
    fn fail(&mut self, mut session: Session, err: ForgeError) -> ForgeError {
        session.status = SessionStatus::Error;
        session.current_step = err.to_string();
        warn!(session = %session.id, error = %err, "forge run failed");
        self.active = Some(session);
        err
    }

    /// Active session required to be idle, for source mutation and run
    /// start.
    fn active_idle_mut(&mut self) -> Result<&mut Session> {
        let session = self.active.as_mut().ok_or_else(no_active)?;
        if session.status != SessionStatus::Idle {
            return Err(ForgeError::InvalidState {
                expected: "idle".to_string(),
                actual: session.status.to_string(),
            });
        }
        Ok(session)
    }
}

fn no_active() -> ForgeError {
    ForgeError::InvalidState {
        expected: "an active session".to_string(),
        actual: "none".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
