//! Projection Engine: include/exclude pruning of result records.
//!
//! Paths are dot-joined field names from the record root. For every field:
//! an exclude match drops it, an include match keeps it regardless of any
//! exclude, and kept objects are walked again with the extended path. Both
//! pattern lists are evaluated as sets, so their order never matters.

use serde_json::{Map, Value};

/// A dot-path pattern where `*` matches any run of characters.
#[derive(Clone, Debug)]
pub struct PathPattern {
    raw: String,
    glob: glob::Pattern,
}

impl PathPattern {
    pub fn new(raw: &str) -> Result<Self, glob::PatternError> {
        Ok(Self {
            raw: raw.to_string(),
            glob: glob::Pattern::new(raw)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Exact match, or a glob match anchored on the whole path.
    pub fn matches(&self, path: &str) -> bool {
        self.raw == path || self.glob.matches(path)
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PathPattern {}

/// Include/exclude pattern lists applied to every record of a response.
#[derive(Clone, Copy, Debug)]
pub struct Projection<'a> {
    include: &'a [PathPattern],
    exclude: &'a [PathPattern],
}

impl<'a> Projection<'a> {
    pub const fn new(include: &'a [PathPattern], exclude: &'a [PathPattern]) -> Self {
        Self { include, exclude }
    }

    /// Nothing to prune.
    pub const fn is_identity(&self) -> bool {
        self.exclude.is_empty()
    }

    pub fn keeps(&self, path: &str) -> bool {
        let excluded = self.exclude.iter().any(|p| p.matches(path));
        !excluded || self.include.iter().any(|p| p.matches(path))
    }

    /// Returns a pruned copy of `record`.
    ///
    /// Non-object values, `null` included, come back unchanged.
    pub fn apply(&self, record: &Value) -> Value {
        if self.is_identity() {
            return record.clone();
        }
        self.walk(record, "")
    }

    /// Prunes `record` in place, avoiding a copy of kept values.
    pub fn apply_owned(&self, record: Value) -> Value {
        if self.is_identity() {
            return record;
        }
        self.walk_owned(record, "")
    }

    fn walk(&self, value: &Value, prefix: &str) -> Value {
        match value {
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, child) in map {
                    let path = join(prefix, key);
                    if self.keeps(&path) {
                        out.insert(key.clone(), self.walk(child, &path));
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(items.iter().map(|item| self.walk(item, prefix)).collect()),
            other => other.clone(),
        }
    }

    fn walk_owned(&self, value: Value, prefix: &str) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter_map(|(key, child)| {
                        let path = join(prefix, &key);
                        self.keeps(&path)
                            .then(|| (key, self.walk_owned(child, &path)))
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.walk_owned(item, prefix))
                    .collect(),
            ),
            other => other,
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
