//! In-memory content graph checked against the relationship schema.
//!
//! The schema only declares relationships. This module is the storage-side
//! pass that holds actual records to them:
//!
//! - **manyToOne**: a record has at most one target per owning field.
//!   Linking again replaces the previous owner.
//! - **manyToMany**: a link is stored once and read from both sides, so
//!   if A lists B then B lists A.
//! - **Trees**: a self-referential manyToOne (`Listing.parent`) must not
//!   form a cycle. Links that would close one are rejected.
//!
//! Records are identified by `(Model, id)`; the graph holds no other
//! content. Links are kept per relationship as `(from_id, to_id)` pairs in
//! the relationship's declared direction, whichever side they were
//! created from.

use crate::schema::{Arity, Cardinality, Model, Schema};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Unknown record {0}:{1}")]
    UnknownRecord(Model, String),
    #[error("{0} has no field named {1}")]
    UnknownField(Model, String),
    #[error("Linking {model}:{id}.{field} -> {target} would create a cycle")]
    Cycle {
        model: Model,
        id: String,
        field: String,
        target: String,
    },
}

#[derive(Debug, Clone)]
pub struct ContentGraph {
    schema: Schema,
    records: BTreeMap<Model, BTreeSet<String>>,
    /// One pair set per relationship, indexed like `schema.relationships`.
    links: Vec<BTreeSet<(String, String)>>,
}

impl ContentGraph {
    pub fn new(schema: Schema) -> Self {
        let links = vec![BTreeSet::new(); schema.relationships.len()];
        Self {
            schema,
            records: BTreeMap::new(),
            links,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Register a record. Inserting an existing record is a no-op.
    pub fn insert(&mut self, model: Model, id: &str) {
        self.records
            .entry(model)
            .or_default()
            .insert(id.to_string());
    }

    pub fn contains(&self, model: Model, id: &str) -> bool {
        self.records.get(&model).is_some_and(|ids| ids.contains(id))
    }

    pub fn len(&self, model: Model) -> usize {
        self.records.get(&model).map_or(0, BTreeSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(BTreeSet::is_empty)
    }

    /// Link `model:id` to `target` through `field`.
    ///
    /// `field` may be either side of its relationship. For a manyToOne
    /// relationship the owning record's previous target is replaced.
    pub fn link(
        &mut self,
        model: Model,
        id: &str,
        field: &str,
        target: &str,
    ) -> Result<(), GraphError> {
        let (rel_idx, owning, target_model) = self.resolve(model, field)?;
        self.require(model, id)?;
        self.require(target_model, target)?;

        let (from_id, to_id) = if owning { (id, target) } else { (target, id) };
        let rel = &self.schema.relationships[rel_idx];

        if rel.cardinality == Cardinality::ManyToOne {
            if rel.from.model == rel.to.model && self.reaches(rel_idx, to_id, from_id) {
                return Err(GraphError::Cycle {
                    model,
                    id: id.to_string(),
                    field: field.to_string(),
                    target: target.to_string(),
                });
            }
            self.links[rel_idx].retain(|(from, _)| from != from_id);
        }

        tracing::trace!(relationship = rel_idx, from = from_id, to = to_id, "link");
        self.links[rel_idx].insert((from_id.to_string(), to_id.to_string()));
        Ok(())
    }

    /// Remove a link. Returns whether it existed.
    pub fn unlink(
        &mut self,
        model: Model,
        id: &str,
        field: &str,
        target: &str,
    ) -> Result<bool, GraphError> {
        let (rel_idx, owning, _) = self.resolve(model, field)?;
        let pair = if owning {
            (id.to_string(), target.to_string())
        } else {
            (target.to_string(), id.to_string())
        };
        Ok(self.links[rel_idx].remove(&pair))
    }

    /// Ids reachable from `model:id` through `field`, sorted.
    pub fn related(&self, model: Model, id: &str, field: &str) -> Result<Vec<&str>, GraphError> {
        let (rel_idx, owning, _) = self.resolve(model, field)?;
        self.require(model, id)?;
        let ids = self.links[rel_idx]
            .iter()
            .filter_map(|(from, to)| {
                if owning && from == id {
                    Some(to.as_str())
                } else if !owning && to == id {
                    Some(from.as_str())
                } else {
                    None
                }
            })
            .collect();
        Ok(ids)
    }

    /// The single target of a one-arity field, if linked.
    pub fn owner(&self, model: Model, id: &str, field: &str) -> Result<Option<&str>, GraphError> {
        let is_one = self
            .schema
            .field(model, field)
            .is_some_and(|f| f.arity == Arity::One);
        if !is_one {
            return Err(GraphError::UnknownField(model, field.to_string()));
        }
        Ok(self.related(model, id, field)?.into_iter().next())
    }

    /// Walk a one-arity field upward: parent, grandparent, and so on.
    pub fn ancestors(&self, model: Model, id: &str, field: &str) -> Result<Vec<&str>, GraphError> {
        let mut chain = Vec::new();
        let mut current = self.owner(model, id, field)?;
        while let Some(next) = current {
            if next == id || chain.contains(&next) {
                break;
            }
            chain.push(next);
            current = self.owner(model, next, field)?;
        }
        Ok(chain)
    }

    fn resolve(&self, model: Model, field: &str) -> Result<(usize, bool, Model), GraphError> {
        self.schema
            .field(model, field)
            .map(|f| (f.relationship, f.owning, f.target.model))
            .ok_or_else(|| GraphError::UnknownField(model, field.to_string()))
    }

    fn require(&self, model: Model, id: &str) -> Result<(), GraphError> {
        if self.contains(model, id) {
            Ok(())
        } else {
            Err(GraphError::UnknownRecord(model, id.to_string()))
        }
    }

    /// Whether following `from -> to` pairs of a relationship starting at
    /// `start` reaches `goal`.
    fn reaches(&self, rel_idx: usize, start: &str, goal: &str) -> bool {
        let mut current = start;
        let mut steps = 0;
        loop {
            if current == goal {
                return true;
            }
            let next = self.links[rel_idx]
                .iter()
                .find(|(from, _)| from == current)
                .map(|(_, to)| to.as_str());
            match next {
                Some(n) if steps <= self.links[rel_idx].len() => {
                    current = n;
                    steps += 1;
                }
                _ => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::web_data;

    fn graph() -> ContentGraph {
        let mut g = ContentGraph::new(web_data());
        for id in ["s1", "s2"] {
            g.insert(Model::Snippet, id);
        }
        for id in ["r1", "r2"] {
            g.insert(Model::Repository, id);
        }
        for id in ["c1", "c2"] {
            g.insert(Model::Collection, id);
        }
        for id in ["root", "js", "react"] {
            g.insert(Model::Listing, id);
        }
        g
    }

    #[test]
    fn many_to_many_visible_from_both_sides() {
        let mut g = graph();
        g.link(Model::Collection, "c1", "snippets", "s1").unwrap();
        g.link(Model::Snippet, "s2", "collections", "c1").unwrap();

        assert_eq!(g.related(Model::Collection, "c1", "snippets").unwrap(), vec!["s1", "s2"]);
        assert_eq!(g.related(Model::Snippet, "s1", "collections").unwrap(), vec!["c1"]);
        assert_eq!(g.related(Model::Snippet, "s2", "collections").unwrap(), vec!["c1"]);
    }

    #[test]
    fn many_to_one_has_single_owner() {
        let mut g = graph();
        g.link(Model::Snippet, "s1", "repository", "r1").unwrap();
        g.link(Model::Snippet, "s1", "repository", "r2").unwrap();

        assert_eq!(g.owner(Model::Snippet, "s1", "repository").unwrap(), Some("r2"));
        assert!(g.related(Model::Repository, "r1", "snippets").unwrap().is_empty());
        assert_eq!(g.related(Model::Repository, "r2", "snippets").unwrap(), vec!["s1"]);
    }

    #[test]
    fn many_to_one_linked_from_the_many_side_replaces_owner() {
        let mut g = graph();
        g.link(Model::Repository, "r1", "snippets", "s1").unwrap();
        g.link(Model::Repository, "r2", "snippets", "s1").unwrap();

        assert_eq!(g.owner(Model::Snippet, "s1", "repository").unwrap(), Some("r2"));
    }

    #[test]
    fn owner_rejects_many_field() {
        let g = graph();
        assert!(matches!(
            g.owner(Model::Repository, "r1", "snippets"),
            Err(GraphError::UnknownField(Model::Repository, _))
        ));
    }

    #[test]
    fn unknown_record_is_error() {
        let mut g = graph();
        assert_eq!(
            g.link(Model::Snippet, "s1", "repository", "missing"),
            Err(GraphError::UnknownRecord(Model::Repository, "missing".into()))
        );
    }

    #[test]
    fn unknown_field_is_error() {
        let mut g = graph();
        assert_eq!(
            g.link(Model::Snippet, "s1", "listings", "root"),
            Err(GraphError::UnknownField(Model::Snippet, "listings".into()))
        );
    }

    #[test]
    fn listing_tree_ancestors() {
        let mut g = graph();
        g.link(Model::Listing, "js", "parent", "root").unwrap();
        g.link(Model::Listing, "react", "parent", "js").unwrap();

        assert_eq!(g.ancestors(Model::Listing, "react", "parent").unwrap(), vec!["js", "root"]);
        assert_eq!(g.related(Model::Listing, "root", "children").unwrap(), vec!["js"]);
    }

    #[test]
    fn listing_cycle_rejected() {
        let mut g = graph();
        g.link(Model::Listing, "js", "parent", "root").unwrap();
        g.link(Model::Listing, "react", "parent", "js").unwrap();

        let err = g.link(Model::Listing, "root", "parent", "react").unwrap_err();
        assert!(matches!(err, GraphError::Cycle { .. }));
        assert_eq!(g.owner(Model::Listing, "root", "parent").unwrap(), None);
    }

    #[test]
    fn listing_cannot_parent_itself() {
        let mut g = graph();
        assert!(matches!(
            g.link(Model::Listing, "js", "parent", "js"),
            Err(GraphError::Cycle { .. })
        ));
    }

    #[test]
    fn reparenting_within_tree_is_allowed() {
        let mut g = graph();
        g.link(Model::Listing, "js", "parent", "root").unwrap();
        g.link(Model::Listing, "react", "parent", "js").unwrap();
        g.link(Model::Listing, "react", "parent", "root").unwrap();

        assert_eq!(g.ancestors(Model::Listing, "react", "parent").unwrap(), vec!["root"]);
    }

    #[test]
    fn unlink_removes_from_both_sides() {
        let mut g = graph();
        g.link(Model::Collection, "c2", "snippets", "s1").unwrap();
        assert!(g.unlink(Model::Snippet, "s1", "collections", "c2").unwrap());
        assert!(g.related(Model::Collection, "c2", "snippets").unwrap().is_empty());
        assert!(!g.unlink(Model::Snippet, "s1", "collections", "c2").unwrap());
    }

    #[test]
    fn record_counts() {
        let g = graph();
        assert_eq!(g.len(Model::Listing), 3);
        assert_eq!(g.len(Model::Author), 0);
        assert!(!g.is_empty());
        assert!(ContentGraph::new(web_data()).is_empty());
    }
}
