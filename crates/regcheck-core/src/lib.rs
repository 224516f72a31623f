//! # regcheck-core — Foundational Types for the Schema Harness
//!
//! This crate defines the data model shared by every stage of the
//! schema-compliance harness. It depends on nothing internal; the
//! `regcheck-schema` engine and the `regcheck` CLI both build on it.
//!
//! ## Key Types
//!
//! - [`SchemaId`] — newtype for a registered schema identifier. No bare
//!   strings for identifiers.
//! - [`SchemaManifestEntry`] / [`Manifest`] — the declared `(id, path)`
//!   pairs that make up a resolution universe.
//! - [`ExampleCase`] / [`Expectation`] — one document paired with the
//!   outcome it is expected to produce.
//! - [`Violation`] / [`ValidationOutcome`] — structured engine results.
//! - [`RunSummary`] / [`ExitStatus`] — aggregate counts and the
//!   process-level success signal.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `regcheck-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod case;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod summary;

// Re-export primary types for ergonomic imports.
pub use case::{ExampleCase, Expectation, PathSegment, ValidationOutcome, Violation};
pub use error::{CaseFailure, ClosureError, ManifestError, ManifestViolation};
pub use identity::SchemaId;
pub use manifest::{Manifest, SchemaManifestEntry};
pub use summary::{ExitStatus, RunSummary};
