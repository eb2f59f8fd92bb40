//! # pocketforge-llm
//!
//! The reasoning-capability boundary for PocketForge.
//!
//! The external capability is modeled strictly behind the
//! [`reasoner::Reasoner`] trait with schema validation at the boundary:
//! deterministic in *shape* (schema-conformant or rejected outright),
//! non-deterministic in *content*, and capable of silently truncating its
//! own output — the system's primary reliability hazard, isolated here so
//! it can be exercised with truncated/garbled fixtures.
//!
//! ## Module Overview
//!
//! - [`reasoner`] — the `Reasoner` trait and its request/error types
//! - [`decode`] — fence stripping + strict wire-schema validation
//! - [`gemini`] — Gemini `generateContent` provider (`provider`, `schema`, `types`)
//! - [`error_parsing`] — API error body → code/message/retryable
//!
//! ## Crate Position
//!
//! Depends on `pocketforge-core`. Depended on by `pocketforge-engine`
//! and the CLI.

#![deny(unsafe_code)]

pub mod decode;
pub mod error_parsing;
pub mod gemini;
pub mod reasoner;

#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use gemini::GeminiReasoner;
pub use reasoner::{CanonicalizeRequest, GenerateRequest, Reasoner, ReasonerError, ReasonerResult};
