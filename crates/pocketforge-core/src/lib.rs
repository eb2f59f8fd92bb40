//! # pocketforge-core
//!
//! Foundation types, errors, and IDs for the PocketForge pipeline.
//!
//! This crate provides the shared vocabulary that all other PocketForge
//! crates depend on:
//!
//! - **Sources**: [`source::SourceFile`] — the normalized form of every upload
//! - **Canonical IR**: [`canonical::CanonicalProject`] and its sub-types
//! - **Artifacts**: [`artifact::Artifact`] generated output files
//! - **Sessions**: [`session::Session`] aggregate root and status lifecycle
//! - **Errors**: [`errors::ForgeError`] taxonomy via `thiserror`
//! - **IDs**: [`ids`] prefixed UUIDv7 generators
//! - **Text**: [`text::truncate_str`] UTF-8-safe prefix truncation
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other pocketforge crates.

#![deny(unsafe_code)]

pub mod artifact;
pub mod canonical;
pub mod errors;
pub mod ids;
pub mod session;
pub mod source;
pub mod text;
