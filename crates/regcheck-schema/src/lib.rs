//! # regcheck-schema — Reference Closure & Validation Orchestration
//!
//! The engine behind the `regcheck` harness. Given a manifest of named
//! schemas and a tree of example documents it verifies that:
//!
//! 1. every cross-schema `$ref` resolves within the declared schema set,
//!    with no network or filesystem discovery; and
//! 2. every example validates, and every invalid case fails to validate,
//!    under JSON Schema Draft 2020-12.
//!
//! ## Pipeline
//!
//! - [`scan`] — lazy depth-first `$ref` target extraction.
//! - [`registry`] — manifest → [`ResolutionUniverse`].
//! - [`closure`] — complete, up-front closure check.
//! - [`engine`] — the [`ValidationEngine`] capability and the
//!   `jsonschema`-backed [`JsonSchemaEngine`] with an offline retriever.
//! - [`orchestrate`] — per-schema, per-case validation.
//! - [`report`] — aggregation and deterministic rendering.
//! - [`harness`] — the pipeline end to end.
//!
//! ## Crate Policy
//!
//! - Depends only on `regcheck-core` internally.
//! - Closure is always checked in full before the engine is invoked.
//! - Execution is sequential; output order is manifest order, then sorted
//!   document paths.

pub mod closure;
pub mod config;
pub mod engine;
pub mod harness;
pub mod layout;
pub mod loader;
pub mod orchestrate;
pub mod registry;
pub mod report;
pub mod scan;

pub use closure::{check_closure, reference_graph};
pub use config::{ConfigError, HarnessConfig};
pub use engine::{EngineError, JsonSchemaEngine, UniverseRetriever, ValidationEngine};
pub use harness::{Harness, HarnessError};
pub use layout::CaseLayout;
pub use loader::{DocumentLoader, FsLoader, LoadError};
pub use orchestrate::Orchestrator;
pub use registry::{RegisteredSchema, RegistryBuilder, ResolutionUniverse};
pub use report::{CaseReport, RunReport, SchemaReport};
pub use scan::{scan_refs, RefScanner, REF_KEY};
