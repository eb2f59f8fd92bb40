//! # pocketforge-engine
//!
//! The PocketForge pipeline: ingest → canonicalize → generate, plus the
//! session state machine, zip archive handling, and the history store.
//!
//! Data flows strictly forward — ingestor output becomes session sources,
//! the canonicalizer's result is attached to the session, the generator's
//! artifacts are attached next, and completed sessions are archived into
//! history. No component mutates another's output after handoff.
//!
//! ## Module Overview
//!
//! - [`ingest`] — archives, loose files, and snippets → [`pocketforge_core::source::SourceFile`]s
//! - [`digest`] — bounded textual digest of a source set
//! - [`forge`] — the [`forge::ForgeEngine`] session state machine
//! - [`archive`] — traversal-safe zip export of an artifact set
//! - [`history`] — append-only, newest-first, file-backed session history
//!
//! ## Crate Position
//!
//! Depends on `pocketforge-core` and `pocketforge-llm`. Depended on by
//! the CLI.

#![deny(unsafe_code)]

pub mod archive;
pub mod digest;
pub mod forge;
pub mod history;
pub mod ingest;
