//! # Closure Checker
//!
//! Verifies that every `$ref` target in the universe is itself registered,
//! before any example is validated.
//!
//! Resolving lazily during validation would only surface a missing
//! registration when some example happens to traverse that branch. Checking
//! the full closure up front makes the failure deterministic and complete:
//! the error lists every unresolved id, not just the first one hit.
//!
//! This stage is pure. It never calls the validation engine.

use std::collections::{BTreeMap, BTreeSet};

use regcheck_core::{ClosureError, SchemaId};

use crate::registry::ResolutionUniverse;
use crate::scan::scan_refs;

/// Every reference target in the universe, mapped to the registered
/// schemas that reference it.
pub fn reference_graph(universe: &ResolutionUniverse) -> BTreeMap<SchemaId, BTreeSet<SchemaId>> {
    let mut graph: BTreeMap<SchemaId, BTreeSet<SchemaId>> = BTreeMap::new();
    for schema in universe.iter() {
        for target in scan_refs(&schema.document) {
            graph.entry(target).or_default().insert(schema.id.clone());
        }
    }
    graph
}

/// Check the closure invariant.
///
/// # Errors
///
/// Returns a [`ClosureError`] whose violation set is exactly the referenced
/// ids that are not keys of the universe, sorted and deduplicated.
pub fn check_closure(universe: &ResolutionUniverse) -> Result<(), ClosureError> {
    let mut graph = reference_graph(universe);
    let referenced = graph.len();
    graph.retain(|target, _| !universe.contains(target));

    if graph.is_empty() {
        tracing::info!(
            schema_count = universe.len(),
            referenced_ids = referenced,
            "reference closure verified"
        );
        Ok(())
    } else {
        tracing::debug!(unresolved = graph.len(), "reference closure violated");
        Err(ClosureError::new(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegisteredSchema;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn universe(schemas: Vec<(&str, Value)>) -> ResolutionUniverse {
        ResolutionUniverse::from_schemas(
            schemas
                .into_iter()
                .map(|(id, document)| RegisteredSchema {
                    id: SchemaId::from(id),
                    path: PathBuf::from(format!("{id}.json")),
                    document: Arc::new(document),
                })
                .collect(),
        )
        .unwrap()
    }

    fn unresolved(err: &ClosureError) -> Vec<&str> {
        err.unresolved().iter().map(SchemaId::as_str).collect()
    }

    #[test]
    fn closed_universe_passes() {
        let u = universe(vec![
            ("A", json!({"properties": {"b": {"$ref": "B#/$defs/x"}}})),
            ("B", json!({"$defs": {"x": {"$ref": "#/$defs/y"}, "y": {}}})),
        ]);
        assert!(check_closure(&u).is_ok());
    }

    #[test]
    fn single_missing_target_is_reported() {
        let u = universe(vec![("A", json!({"$ref": "B"}))]);
        let err = check_closure(&u).unwrap_err();
        assert_eq!(unresolved(&err), vec!["B"]);
        assert_eq!(
            err.referrers(&SchemaId::from("B")).map(SchemaId::as_str).collect::<Vec<_>>(),
            vec!["A"]
        );
    }

    #[test]
    fn all_missing_targets_are_reported_sorted_and_deduplicated() {
        let u = universe(vec![
            ("A", json!({"allOf": [{"$ref": "urn:z"}, {"$ref": "urn:b#/x"}, {"$ref": "C"}]})),
            ("C", json!({"items": {"$ref": "urn:b"}})),
        ]);
        let err = check_closure(&u).unwrap_err();
        assert_eq!(unresolved(&err), vec!["urn:b", "urn:z"]);
        assert_eq!(
            err.referrers(&SchemaId::from("urn:b")).map(SchemaId::as_str).collect::<Vec<_>>(),
            vec!["A", "C"]
        );
    }

    #[test]
    fn self_reference_is_closed() {
        let u = universe(vec![("A", json!({"items": {"$ref": "A"}}))]);
        assert!(check_closure(&u).is_ok());
    }

    #[test]
    fn reference_graph_includes_resolved_targets() {
        let u = universe(vec![("A", json!({"$ref": "A"})), ("B", json!({"$ref": "A"}))]);
        let graph = reference_graph(&u);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph[&SchemaId::from("A")].len(), 2);
    }

    proptest! {
        #[test]
        fn violations_equal_exact_set_difference(
            registered in proptest::collection::btree_set("[a-f]", 1..5),
            refs in proptest::collection::vec(proptest::collection::vec("[a-j]", 0..4), 1..5),
        ) {
            let ids: Vec<String> = registered.into_iter().collect();
            let schemas: Vec<(&str, Value)> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    let targets = refs.get(i).cloned().unwrap_or_default();
                    let doc = json!({
                        "anyOf": targets.iter().map(|t| json!({"$ref": format!("{t}#/frag")})).collect::<Vec<_>>()
                    });
                    (id.as_str(), doc)
                })
                .collect();

            let expected: BTreeSet<String> = refs
                .iter()
                .take(ids.len())
                .flatten()
                .filter(|t| !ids.contains(t))
                .cloned()
                .collect();

            let u = universe(schemas);
            match check_closure(&u) {
                Ok(()) => prop_assert!(expected.is_empty()),
                Err(err) => {
                    let got: BTreeSet<String> =
                        err.unresolved().iter().map(|id| id.as_str().to_string()).collect();
                    prop_assert_eq!(got, expected);
                }
            }
        }
    }
}
