//! Filter specs and their compilation into predicate clauses.
//!
//! Operators form a closed set: an operator name outside [`FilterOperator`] is
//! rejected while parsing, and compilation is an exhaustive match. The clauses
//! produced by [`compile`] are ANDed together by the store.

use core::cmp::Ordering;
use core::fmt;

use serde::Serialize;

use crate::error::{Issue, IssueCode};
use crate::schema::FieldKind;

/// Operator named in a filter parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    Like,
    Range,
}

impl FilterOperator {
    pub const ALL: [Self; 7] = [
        Self::Eq,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::Like,
        Self::Range,
    ];

    /// Looks up an operator by its parameter name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Like => "like",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed filter operand.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl FilterValue {
    /// Types a raw parameter value according to the field it filters.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<Self, IssueCode> {
        match kind {
            FieldKind::Numeric => {
                let raw = raw.trim();
                if let Ok(i) = raw.parse::<i64>() {
                    Ok(Self::Integer(i))
                } else {
                    raw.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(Self::Real)
                        .ok_or(IssueCode::InvalidNumber)
                }
            }
            FieldKind::Boolean => match raw.trim() {
                "true" | "1" => Ok(Self::Bool(true)),
                "false" | "0" => Ok(Self::Bool(false)),
                _ => Err(IssueCode::InvalidBoolean),
            },
            FieldKind::Text | FieldKind::TriState => Ok(Self::Text(raw.to_string())),
        }
    }

    /// Compares this operand against a stored JSON value.
    ///
    /// Numbers compare numerically, strings lexicographically and booleans by
    /// value. Mismatched types and `null` are unordered.
    pub fn compare_to(&self, stored: &serde_json::Value) -> Option<Ordering> {
        use serde_json::Value;

        match (stored, self) {
            (Value::Number(n), Self::Integer(i)) => match n.as_i64() {
                Some(s) => Some(s.cmp(i)),
                None => n.as_f64()?.partial_cmp(&(*i as f64)),
            },
            (Value::Number(n), Self::Real(r)) => n.as_f64()?.partial_cmp(r),
            (Value::String(s), Self::Text(t)) => Some(s.as_str().cmp(t.as_str())),
            // numeric columns compare numeric-looking text as a number
            (Value::Number(n), Self::Text(t)) => match t.trim().parse::<i64>() {
                Ok(i) => Self::Integer(i).compare_to(stored),
                Err(_) => n.as_f64()?.partial_cmp(&t.trim().parse::<f64>().ok()?),
            },
            (Value::Bool(b), Self::Bool(v)) => Some(b.cmp(v)),
            (Value::Number(n), Self::Bool(v)) => Some(n.as_i64()?.cmp(&i64::from(*v))),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(t) => f.write_str(t),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One field's filter intent, already typed and validated.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterSpec {
    /// `eq`, `gt`, `lt`, `gte`, `lte`, or `like` with a normalized pattern
    Single { op: FilterOperator, value: FilterValue },
    /// Inclusive on both ends
    Range { min: FilterValue, max: FilterValue },
    /// Tri-state presence test
    Null { is_null: bool },
}

impl FilterSpec {
    /// Builds a spec for `field` from an operator and its raw value.
    ///
    /// `path` locates the parameter in the request for error reporting.
    pub fn build(kind: FieldKind, op: FilterOperator, raw: &str, path: &[&str]) -> Result<Self, Issue> {
        let issue = |code: IssueCode, message: String| Issue::new(code, message, path.iter().copied());

        if kind == FieldKind::TriState && op == FilterOperator::Eq {
            match raw {
                "true" => return Ok(Self::Null { is_null: false }),
                "false" | "null" => return Ok(Self::Null { is_null: true }),
                _ => {}
            }
        }

        if kind == FieldKind::Boolean && op != FilterOperator::Eq {
            return Err(issue(
                IssueCode::UnsupportedOperator,
                format!("boolean fields only support 'eq', got '{op}'"),
            ));
        }

        match op {
            FilterOperator::Range => {
                let Some((min, max)) = raw.split_once(',') else {
                    return Err(issue(
                        IssueCode::InvalidRange,
                        format!("expected 'min,max', got '{raw}'"),
                    ));
                };
                if min.contains('*') || max.contains('*') {
                    return Err(issue(
                        IssueCode::InvalidRange,
                        "range bounds cannot contain wildcards".to_string(),
                    ));
                }
                let parse = |bound: &str| {
                    FilterValue::parse(kind, bound).map_err(|code| {
                        issue(code, format!("invalid range bound '{bound}' for a {} field", kind.as_str()))
                    })
                };
                Ok(Self::Range {
                    min: parse(min)?,
                    max: parse(max)?,
                })
            }
            _ if kind.accepts_wildcards() && raw.contains('*') => Ok(Self::Single {
                op: FilterOperator::Like,
                value: FilterValue::Text(like_pattern(raw)),
            }),
            FilterOperator::Like if !kind.accepts_wildcards() => Err(issue(
                IssueCode::UnsupportedOperator,
                format!("'like' is not supported on {} fields", kind.as_str()),
            )),
            FilterOperator::Like => Ok(Self::Single {
                op,
                value: FilterValue::Text(like_pattern(raw)),
            }),
            FilterOperator::Eq
            | FilterOperator::Gt
            | FilterOperator::Lt
            | FilterOperator::Gte
            | FilterOperator::Lte => {
                let value = FilterValue::parse(kind, raw).map_err(|code| {
                    issue(code, format!("'{raw}' is not a valid {} value", kind.as_str()))
                })?;
                Ok(Self::Single { op, value })
            }
        }
    }
}

/// Comparison used by a [`Predicate::Compare`] clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Comparison {
    /// Whether `ordering` (stored value vs operand) satisfies this comparison.
    pub const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Gte => !matches!(ordering, Ordering::Less),
            Self::Lte => !matches!(ordering, Ordering::Greater),
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }
}

/// A single boolean condition on one column of the primary entity.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    Compare {
        field: String,
        cmp: Comparison,
        value: FilterValue,
    },
    /// `%` matches any run of characters, `_` one character, `\` escapes
    Like { field: String, pattern: String },
    IsNull { field: String },
    IsNotNull { field: String },
}

impl Predicate {
    pub fn field(&self) -> &str {
        match self {
            Self::Compare { field, .. }
            | Self::Like { field, .. }
            | Self::IsNull { field }
            | Self::IsNotNull { field } => field,
        }
    }

    /// Evaluates this clause against a JSON record.
    pub fn matches(&self, record: &serde_json::Map<String, serde_json::Value>) -> bool {
        let stored = record.get(self.field()).unwrap_or(&serde_json::Value::Null);
        match self {
            Self::Compare { cmp, value, .. } => value
                .compare_to(stored)
                .is_some_and(|ordering| cmp.holds(ordering)),
            Self::Like { pattern, .. } => stored
                .as_str()
                .is_some_and(|text| like_matches(pattern, text)),
            Self::IsNull { .. } => stored.is_null(),
            Self::IsNotNull { .. } => !stored.is_null(),
        }
    }
}

/// Compiles per-field specs into predicate clauses, preserving request order.
pub fn compile<'a, I>(filters: I) -> Vec<Predicate>
where
    I: IntoIterator<Item = (&'a str, &'a [FilterSpec])>,
{
    let mut predicates = Vec::new();
    for (field, specs) in filters {
        for spec in specs {
            compile_spec(field, spec, &mut predicates);
        }
    }
    predicates
}

fn compile_spec(field: &str, spec: &FilterSpec, out: &mut Vec<Predicate>) {
    let compare = |cmp: Comparison, value: &FilterValue| Predicate::Compare {
        field: field.to_string(),
        cmp,
        value: value.clone(),
    };

    match spec {
        FilterSpec::Single { op, value } => match op {
            FilterOperator::Eq => out.push(compare(Comparison::Eq, value)),
            FilterOperator::Gt => out.push(compare(Comparison::Gt, value)),
            FilterOperator::Lt => out.push(compare(Comparison::Lt, value)),
            FilterOperator::Gte => out.push(compare(Comparison::Gte, value)),
            FilterOperator::Lte => out.push(compare(Comparison::Lte, value)),
            FilterOperator::Like => out.push(Predicate::Like {
                field: field.to_string(),
                pattern: value.to_string(),
            }),
            // A single-valued range is the closed interval [value, value].
            FilterOperator::Range => {
                out.push(compare(Comparison::Gte, value));
                out.push(compare(Comparison::Lte, value));
            }
        },
        FilterSpec::Range { min, max } => {
            out.push(compare(Comparison::Gte, min));
            out.push(compare(Comparison::Lte, max));
        }
        FilterSpec::Null { is_null: true } => out.push(Predicate::IsNull {
            field: field.to_string(),
        }),
        FilterSpec::Null { is_null: false } => out.push(Predicate::IsNotNull {
            field: field.to_string(),
        }),
    }
}

/// Escapes a raw value into a `like` pattern, turning `*` into `%`.
pub fn like_pattern(raw: &str) -> String {
    let mut pattern = String::with_capacity(raw.len() + 2);
    for c in raw.chars() {
        match c {
            '*' => pattern.push('%'),
            '%' | '_' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            _ => pattern.push(c),
        }
    }
    pattern
}

/// Translates a `like` pattern (`%`, `_`, `\` escapes) into a case-sensitive
/// glob, bracketing characters glob treats as special.
///
/// Runs of `%` collapse into a single `*`.
pub fn like_to_glob(pattern: &str) -> String {
    fn literal(out: &mut String, c: char) {
        match c {
            '*' => out.push_str("[*]"),
            '?' => out.push_str("[?]"),
            '[' => out.push_str("[[]"),
            c => out.push(c),
        }
    }

    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars();
    let mut after_any = false;
    while let Some(c) = chars.next() {
        match c {
            '%' if after_any => continue,
            '%' => out.push('*'),
            '\\' => literal(&mut out, chars.next().unwrap_or('\\')),
            '_' => out.push('?'),
            c => literal(&mut out, c),
        }
        after_any = c == '%';
    }
    out
}

/// Case-sensitive `like` matching, evaluated as the equivalent glob.
pub fn like_matches(pattern: &str, text: &str) -> bool {
    glob::Pattern::new(&like_to_glob(pattern)).is_ok_and(|glob| glob.matches(text))
}
