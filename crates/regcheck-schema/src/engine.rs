//! # Validation Engine
//!
//! The harness consumes JSON Schema evaluation as a capability:
//! [`ValidationEngine::validate`] takes a schema id, the resolution universe,
//! and a document, and returns the ordered violations (empty = valid). The
//! orchestrator receives the engine by injection, so tests substitute fakes.
//!
//! [`JsonSchemaEngine`] is the production engine, backed by the `jsonschema`
//! crate under Draft 2020-12.
//!
//! ## Offline resolution
//!
//! Every universe document is registered with the engine up front, under its
//! declared id and under its `$id` when that differs, so `$ref`s (with or
//! without a fragment) resolve without retrieval. Relative ids land under the
//! engine's default base URI (`json-schema:///`).
//!
//! Anything not registered goes to [`UniverseRetriever`], which looks ids up
//! in the universe and nowhere else: literally, under the default base, or
//! as the trailing path of the requested URI. Anything else is a retrieval
//! error. No request ever leaves the process.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::{Resource, Retrieve, Uri, Validator};
use regcheck_core::{SchemaId, Violation};
use serde_json::Value;
use thiserror::Error;

use crate::registry::{RegisteredSchema, ResolutionUniverse};

/// Base URI the engine assigns to schemas without an `$id`.
const DEFAULT_BASE_URI: &str = "json-schema:///";

/// Error evaluating a schema, as opposed to the document failing it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The requested schema is not in the universe.
    #[error("schema not found: {0}")]
    SchemaNotFound(SchemaId),

    /// The schema could not be compiled (invalid keyword, unresolvable `$ref`).
    #[error("failed to compile schema {schema_id}: {reason}")]
    Compile {
        /// The schema being compiled.
        schema_id: SchemaId,
        /// Engine message.
        reason: String,
    },
}

/// Validates documents against schemas of a resolution universe.
pub trait ValidationEngine {
    /// Validate `document` against schema `schema_id`.
    ///
    /// Returns every violation in the engine's order; an empty vector means
    /// the document is valid.
    fn validate(
        &self,
        schema_id: &SchemaId,
        universe: &ResolutionUniverse,
        document: &Value,
    ) -> Result<Vec<Violation>, EngineError>;
}

impl<E: ValidationEngine + ?Sized> ValidationEngine for &E {
    fn validate(
        &self,
        schema_id: &SchemaId,
        universe: &ResolutionUniverse,
        document: &Value,
    ) -> Result<Vec<Violation>, EngineError> {
        (**self).validate(schema_id, universe, document)
    }
}

/// Serves `$ref` retrievals from the resolution universe only.
pub struct UniverseRetriever {
    schemas: Vec<(SchemaId, Arc<Value>)>,
}

impl UniverseRetriever {
    /// Snapshot the universe's documents for retrieval.
    pub fn new(universe: &ResolutionUniverse) -> Self {
        Self {
            schemas: universe
                .iter()
                .map(|s| (s.id.clone(), Arc::clone(&s.document)))
                .collect(),
        }
    }

    /// Find the document a retrieval URI names, if it is in the universe.
    pub fn lookup(&self, uri: &str) -> Option<&Value> {
        let uri = uri.split_once('#').map_or(uri, |(base, _)| base);
        let exact = |candidate: &str| {
            self.schemas
                .iter()
                .find(|(id, _)| id.as_str() == candidate)
                .map(|(_, doc)| doc.as_ref())
        };

        if let Some(doc) = exact(uri) {
            return Some(doc);
        }
        if let Some(doc) = uri.strip_prefix(DEFAULT_BASE_URI).and_then(exact) {
            return Some(doc);
        }

        // Relative ids nested under another relative base end up with extra
        // leading segments; take the longest registered id the URI ends with.
        self.schemas
            .iter()
            .filter(|(id, _)| {
                uri.strip_suffix(id.as_str())
                    .is_some_and(|prefix| prefix.ends_with('/'))
            })
            .max_by_key(|(id, _)| id.as_str().len())
            .map(|(_, doc)| doc.as_ref())
    }
}

impl Retrieve for UniverseRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.lookup(uri_str)
            .cloned()
            .ok_or_else(|| format!("{uri_str} is not in the resolution universe").into())
    }
}

/// Draft 2020-12 engine backed by the `jsonschema` crate.
///
/// Each schema is compiled once per universe; later cases reuse the
/// compiled validator, or the compile error.
#[derive(Default)]
pub struct JsonSchemaEngine {
    compiled: RefCell<HashMap<(u64, SchemaId), Result<Arc<Validator>, EngineError>>>,
}

impl JsonSchemaEngine {
    /// Create an engine with an empty validator cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile schema `schema_id` with every universe document registered
    /// as an in-memory resource. The retriever only answers for URIs that
    /// are not registered, and only ever with an error or a universe document.
    pub fn compile(
        &self,
        schema_id: &SchemaId,
        universe: &ResolutionUniverse,
    ) -> Result<Validator, EngineError> {
        let compile_error = |reason: String| EngineError::Compile {
            schema_id: schema_id.clone(),
            reason,
        };
        let schema = universe
            .document(schema_id)
            .ok_or_else(|| EngineError::SchemaNotFound(schema_id.clone()))?;

        let mut options = jsonschema::options();
        options
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(UniverseRetriever::new(universe));
        for registered in universe.iter() {
            for uri in resource_uris(registered) {
                let resource = Resource::from_contents(registered.document.as_ref().clone())
                    .map_err(|e| compile_error(format!("cannot register {uri}: {e}")))?;
                options.with_resource(uri, resource);
            }
        }

        options.build(schema).map_err(|e| compile_error(e.to_string()))
    }

    /// The cached validator for `schema_id`, compiling it on first use.
    fn validator(
        &self,
        schema_id: &SchemaId,
        universe: &ResolutionUniverse,
    ) -> Result<Arc<Validator>, EngineError> {
        let key = (universe.generation(), schema_id.clone());
        if let Some(cached) = self.compiled.borrow().get(&key) {
            return cached.clone();
        }
        let compiled = self.compile(schema_id, universe).map(Arc::new);
        if compiled.is_ok() {
            tracing::debug!(schema = %schema_id, "compiled schema");
        }
        self.compiled.borrow_mut().insert(key, compiled.clone());
        compiled
    }

    /// Number of cached compile results.
    pub fn cached(&self) -> usize {
        self.compiled.borrow().len()
    }
}

/// URIs a registered schema is reachable under: its declared id, and its
/// `$id` when that differs.
fn resource_uris(schema: &RegisteredSchema) -> Vec<String> {
    let mut uris = vec![schema.id.as_str().to_owned()];
    if let Some(declared) = schema.document.get("$id").and_then(Value::as_str) {
        let declared = declared.trim_end_matches('#');
        if !declared.is_empty() && declared != schema.id.as_str() {
            uris.push(declared.to_owned());
        }
    }
    uris
}

impl ValidationEngine for JsonSchemaEngine {
    fn validate(
        &self,
        schema_id: &SchemaId,
        universe: &ResolutionUniverse,
        document: &Value,
    ) -> Result<Vec<Violation>, EngineError> {
        let validator = self.validator(schema_id, universe)?;
        Ok(validator
            .iter_errors(document)
            .map(|err| Violation::new(err.instance_path.to_string(), err.to_string()))
            .collect())
    }
}
