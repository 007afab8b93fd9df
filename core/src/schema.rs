//! Per-entity schema descriptors.
//!
//! A resource hands the engine an [`EntitySchema`] describing which fields can be
//! filtered, how their values are typed, which composite key orders the
//! listing, and which relations may be expanded. Descriptors are plain data so
//! they can be built in code or deserialized from configuration.

use serde::{Deserialize, Serialize};

/// Semantic type of a filterable field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Integer or real values, compared numerically
    Numeric,
    /// Text values, compared lexicographically, `*` wildcards allowed
    Text,
    /// Boolean flags, equality only
    Boolean,
    /// Optional reference: `true` / `false` / `null` test presence, anything
    /// else is matched as text
    TriState,
}

impl FieldKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::TriState => "tri_state",
        }
    }

    /// Whether `*` in a value turns the filter into a pattern match.
    pub const fn accepts_wildcards(self) -> bool {
        matches!(self, Self::Text | Self::TriState)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A relation that can be joined in with `expand=<name>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Name used in `expand` and as the sub-object key in results
    pub name: String,
    /// Table holding the related entity
    pub table: String,
    /// Column on the primary entity
    pub local_key: String,
    /// Column on the related entity
    pub foreign_key: String,
    /// Related columns copied into the sub-object
    pub fields: Vec<String>,
}

impl Relation {
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            local_key: local_key.into(),
            foreign_key: foreign_key.into(),
            fields: Vec::new(),
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Composite `(primary, secondary)` ordering key; both columns are integers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorKey {
    pub primary: String,
    pub secondary: String,
}

impl CursorKey {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Everything the engine needs to know about one listable entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Public name of the entity, used in errors and logs
    pub name: String,
    /// Backing table
    pub table: String,
    /// Column matched by single-resource lookups
    pub id_field: String,
    pub cursor_key: CursorKey,
    /// Columns returned for each record, every column when empty
    #[serde(default)]
    pub columns: Vec<String>,
    /// Filterable fields, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl EntitySchema {
    /// Creates a schema whose table is named after the entity.
    pub fn new(name: impl Into<String>, id_field: impl Into<String>, cursor_key: CursorKey) -> Self {
        let name = name.into();
        Self {
            table: name.clone(),
            name,
            id_field: id_field.into(),
            cursor_key,
            columns: Vec::new(),
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef::new(name, kind));
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.kind)
    }

    pub fn relation_named(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }
}
