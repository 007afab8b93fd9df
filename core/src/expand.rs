//! Expansion Resolver
//!
//! Turns `expand=` relation names into join specifications. Each expansion
//! adds one LEFT join of the related table, aliased by the relation name, and
//! one sub-object of the same name on every result record. Expansions never
//! filter rows: a record with no related row gets `null` for the sub-object.

use crate::error::{Issue, IssueCode, ValidationErrors};
use crate::schema::{EntitySchema, Relation};

/// One LEFT-joined relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinSpec {
    /// Relation name, used as the table alias and the sub-object key
    pub alias: String,
    pub table: String,
    /// Column on the primary entity
    pub local_key: String,
    /// Column on the joined table
    pub foreign_key: String,
    /// Joined columns copied into the sub-object, in declaration order
    pub columns: Vec<String>,
}

impl JoinSpec {
    /// Creates a LEFT join for `relation`.
    pub fn left(relation: &Relation) -> Self {
        Self {
            alias: relation.name.clone(),
            table: relation.table.clone(),
            local_key: relation.local_key.clone(),
            foreign_key: relation.foreign_key.clone(),
            columns: relation.fields.clone(),
        }
    }

    /// Key a record carries its expanded sub-object under.
    pub fn sub_object(&self) -> &str {
        &self.alias
    }
}

/// Resolves requested relation names against `schema`, in request order.
///
/// Every unknown name is reported; names are expected to be deduplicated.
pub fn resolve<S: AsRef<str>>(schema: &EntitySchema, expansions: &[S]) -> Result<Vec<JoinSpec>, ValidationErrors> {
    let mut issues = ValidationErrors::new();
    let mut joins = Vec::with_capacity(expansions.len());

    for name in expansions {
        let name = name.as_ref();
        match schema.relation_named(name) {
            Some(relation) => joins.push(JoinSpec::left(relation)),
            None => issues.push(Issue::new(
                IssueCode::UnknownRelation,
                format!("unknown relation '{name}' for {}", schema.name),
                ["expand", name],
            )),
        }
    }

    if issues.is_empty() { Ok(joins) } else { Err(issues) }
}
