//! Content relationship schema.
//!
//! Declares the content entities of the site and how they relate. The
//! schema is plain data: a name, an ordered list of relationships, and a
//! map of named toggles. It serializes to the shape an external content
//! framework expects:
//!
//! ```json
//! {
//!   "name": "WebData",
//!   "relationships": [
//!     {
//!       "from": { "model": "Snippet", "name": "repository" },
//!       "to": { "model": "Repository", "name": "snippets" },
//!       "type": "manyToOne"
//!     }
//!   ],
//!   "config": { "experimentalAPIMessages": "off" }
//! }
//! ```
//!
//! ## Cardinality
//!
//! | Type | `from` side | `to` side |
//! |------|-------------|-----------|
//! | `manyToOne` | one target | many sources |
//! | `manyToMany` | many targets | many sources |
//!
//! A relationship is addressable from both ends: `Snippet.repository` and
//! `Repository.snippets` are the same link seen from opposite sides. See
//! [`Schema::fields_of`] and [`Schema::reciprocal`].
//!
//! The schema itself enforces nothing about records. [`crate::graph`] is the
//! storage-side pass that holds records to these rules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("Duplicate field {model}.{name}")]
    DuplicateField { model: Model, name: String },
    #[error("Self-referential relationship on {0} uses the same field name on both sides")]
    SelfReferenceCollision(Model),
    #[error("Relationship endpoint {model}.{name} does not resolve back to its reciprocal")]
    Unresolvable { model: Model, name: String },
}

/// A named content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Model {
    Snippet,
    Repository,
    Collection,
    Language,
    Tag,
    Author,
    Listing,
    Page,
}

impl Model {
    pub const ALL: [Model; 8] = [
        Model::Snippet,
        Model::Repository,
        Model::Collection,
        Model::Language,
        Model::Tag,
        Model::Author,
        Model::Listing,
        Model::Page,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Model::Snippet => "Snippet",
            Model::Repository => "Repository",
            Model::Collection => "Collection",
            Model::Language => "Language",
            Model::Tag => "Tag",
            Model::Author => "Author",
            Model::Listing => "Listing",
            Model::Page => "Page",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    ManyToOne,
    ManyToMany,
}

/// One end of a relationship: a field on a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub model: Model,
    pub name: String,
}

impl Endpoint {
    pub fn new(model: Model, name: &str) -> Self {
        Self {
            model,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.model, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: Endpoint,
    pub to: Endpoint,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
}

/// How many records a field points at, seen from its own model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    Many,
}

/// A field addressable on a model, resolved against its relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub name: &'a str,
    pub arity: Arity,
    pub target: &'a Endpoint,
    /// Index into [`Schema::relationships`].
    pub relationship: usize,
    /// True when this field is the relationship's `from` side.
    pub owning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub relationships: Vec<Relationship>,
    pub config: BTreeMap<String, String>,
}

impl Schema {
    /// Every field addressable on `model`, in declaration order.
    ///
    /// `from` endpoints of a `manyToOne` relationship have arity `One`;
    /// every other endpoint has arity `Many`.
    pub fn fields_of(&self, model: Model) -> Vec<Field<'_>> {
        let mut fields = Vec::new();
        for (idx, rel) in self.relationships.iter().enumerate() {
            if rel.from.model == model {
                fields.push(Field {
                    name: &rel.from.name,
                    arity: match rel.cardinality {
                        Cardinality::ManyToOne => Arity::One,
                        Cardinality::ManyToMany => Arity::Many,
                    },
                    target: &rel.to,
                    relationship: idx,
                    owning: true,
                });
            }
            if rel.to.model == model {
                fields.push(Field {
                    name: &rel.to.name,
                    arity: Arity::Many,
                    target: &rel.from,
                    relationship: idx,
                    owning: false,
                });
            }
        }
        fields
    }

    /// Look up a single field by name.
    pub fn field(&self, model: Model, name: &str) -> Option<Field<'_>> {
        self.fields_of(model).into_iter().find(|f| f.name == name)
    }

    /// The endpoint on the other side of `endpoint`'s relationship.
    pub fn reciprocal(&self, endpoint: &Endpoint) -> Option<&Endpoint> {
        self.field(endpoint.model, &endpoint.name).map(|f| f.target)
    }

    /// Structural check over the declared relationships.
    ///
    /// Field names must be unique per model, and every endpoint must resolve
    /// to the reciprocal it was declared with.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for rel in &self.relationships {
            if rel.from.model == rel.to.model && rel.from.name == rel.to.name {
                return Err(SchemaError::SelfReferenceCollision(rel.from.model));
            }
        }

        for model in Model::ALL {
            let mut seen = HashSet::new();
            for field in self.fields_of(model) {
                if !seen.insert(field.name) {
                    return Err(SchemaError::DuplicateField {
                        model,
                        name: field.name.to_string(),
                    });
                }
            }
        }

        for rel in &self.relationships {
            for (side, other) in [(&rel.from, &rel.to), (&rel.to, &rel.from)] {
                if self.reciprocal(side) != Some(other) {
                    return Err(SchemaError::Unresolvable {
                        model: side.model,
                        name: side.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn rel(from: (Model, &str), to: (Model, &str), cardinality: Cardinality) -> Relationship {
    Relationship {
        from: Endpoint::new(from.0, from.1),
        to: Endpoint::new(to.0, to.1),
        cardinality,
    }
}

/// The site's content schema.
pub fn web_data() -> Schema {
    use Cardinality::*;
    use Model::*;

    Schema {
        name: "WebData".to_string(),
        relationships: vec![
            rel((Snippet, "repository"), (Repository, "snippets"), ManyToOne),
            rel((Collection, "snippets"), (Snippet, "collections"), ManyToMany),
            rel((Repository, "language"), (Language, "repositories"), ManyToOne),
            rel(
                (Repository, "otherLanguages"),
                (Language, "secondaryRepositories"),
                ManyToMany,
            ),
            rel((Tag, "repository"), (Repository, "tags"), ManyToOne),
            rel((Snippet, "author"), (Author, "articles"), ManyToOne),
            rel((Listing, "parent"), (Listing, "children"), ManyToOne),
            rel((Page, "snippets"), (Snippet, "pages"), ManyToMany),
            rel((Page, "listings"), (Listing, "pages"), ManyToMany),
        ],
        config: BTreeMap::from([("experimentalAPIMessages".to_string(), "off".to_string())]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_data_is_valid() {
        assert_eq!(web_data().validate(), Ok(()));
    }

    #[test]
    fn every_target_reciprocates() {
        let schema = web_data();
        for rel in &schema.relationships {
            assert_eq!(schema.reciprocal(&rel.to), Some(&rel.from), "{}", rel.to);
            assert_eq!(schema.reciprocal(&rel.from), Some(&rel.to), "{}", rel.from);
        }
    }

    #[test]
    fn many_to_one_owner_side_has_arity_one() {
        let schema = web_data();
        let repo = schema.field(Model::Snippet, "repository").unwrap();
        assert_eq!(repo.arity, Arity::One);
        assert!(repo.owning);

        let snippets = schema.field(Model::Repository, "snippets").unwrap();
        assert_eq!(snippets.arity, Arity::Many);
        assert!(!snippets.owning);
    }

    #[test]
    fn many_to_many_is_many_on_both_sides() {
        let schema = web_data();
        assert_eq!(
            schema.field(Model::Collection, "snippets").unwrap().arity,
            Arity::Many
        );
        assert_eq!(
            schema.field(Model::Snippet, "collections").unwrap().arity,
            Arity::Many
        );
    }

    #[test]
    fn snippet_fields_in_declaration_order() {
        let schema = web_data();
        let names: Vec<&str> = schema
            .fields_of(Model::Snippet)
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["repository", "collections", "author", "pages"]);
    }

    #[test]
    fn listing_self_reference_exposes_both_fields() {
        let schema = web_data();
        let parent = schema.field(Model::Listing, "parent").unwrap();
        let children = schema.field(Model::Listing, "children").unwrap();
        assert_eq!(parent.target.name, "children");
        assert_eq!(children.target.name, "parent");
        assert_eq!(parent.relationship, children.relationship);
    }

    #[test]
    fn unknown_field_has_no_reciprocal() {
        let schema = web_data();
        assert!(schema.reciprocal(&Endpoint::new(Model::Tag, "snippets")).is_none());
    }

    #[test]
    fn duplicate_field_rejected() {
        let mut schema = web_data();
        schema.relationships.push(rel(
            (Model::Snippet, "author"),
            (Model::Author, "favourites"),
            Cardinality::ManyToMany,
        ));
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateField {
                model: Model::Snippet,
                name: "author".into()
            })
        );
    }

    #[test]
    fn self_reference_collision_rejected() {
        let mut schema = web_data();
        schema.relationships.push(rel(
            (Model::Tag, "related"),
            (Model::Tag, "related"),
            Cardinality::ManyToMany,
        ));
        assert_eq!(
            schema.validate(),
            Err(SchemaError::SelfReferenceCollision(Model::Tag))
        );
    }

    #[test]
    fn serializes_to_consumer_shape() {
        let json: serde_json::Value = serde_json::from_str(&web_data().to_json().unwrap()).unwrap();
        assert_eq!(json["name"], "WebData");
        assert_eq!(json["config"]["experimentalAPIMessages"], "off");
        let first = &json["relationships"][0];
        assert_eq!(first["from"]["model"], "Snippet");
        assert_eq!(first["from"]["name"], "repository");
        assert_eq!(first["to"]["model"], "Repository");
        assert_eq!(first["type"], "manyToOne");
        assert_eq!(json["relationships"][1]["type"], "manyToMany");
        assert_eq!(json["relationships"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn round_trips_through_json() {
        let schema = web_data();
        let back: Schema = serde_json::from_str(&schema.to_json().unwrap()).unwrap();
        assert_eq!(back, schema);
    }
}
