use core::fmt;

use serde::Serialize;
use thiserror::Error;

/// Machine-readable classification of a single request problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    UnknownField,
    UnknownOperator,
    UnsupportedOperator,
    UnknownRelation,
    InvalidNumber,
    InvalidBoolean,
    InvalidRange,
    InvalidInteger,
    InvalidCursor,
    InvalidOrder,
    InvalidPattern,
    OutOfRange,
    NotFound,
}

impl IssueCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownField => "unknown_field",
            Self::UnknownOperator => "unknown_operator",
            Self::UnsupportedOperator => "unsupported_operator",
            Self::UnknownRelation => "unknown_relation",
            Self::InvalidNumber => "invalid_number",
            Self::InvalidBoolean => "invalid_boolean",
            Self::InvalidRange => "invalid_range",
            Self::InvalidInteger => "invalid_integer",
            Self::InvalidCursor => "invalid_cursor",
            Self::InvalidOrder => "invalid_order",
            Self::InvalidPattern => "invalid_pattern",
            Self::OutOfRange => "out_of_range",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One offending parameter, with the path of the input that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    pub message: String,
    pub path: Vec<String>,
}

impl Issue {
    pub fn new<P, S>(code: IssueCode, message: impl Into<String>, path: P) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code,
            message: message.into(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

/// Every issue found while validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub issues: Vec<Issue>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if some issue carries `code`.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }

    /// Fails with the collected issues, or yields `value` if there are none.
    pub fn finish<T>(self, value: T) -> Result<T> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(QueryError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", issue.path.join("."), issue.message)?;
        }
        Ok(())
    }
}

/// A store rejected or failed a query.
///
/// `Display` only shows the redacted message; `diagnostic` holds the raw store
/// detail and is meant for logs, never for response bodies.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    pub diagnostic: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Wraps a raw store failure behind a generic message.
    pub fn execution(diagnostic: impl fmt::Display) -> Self {
        Self::new("query execution failed", diagnostic.to_string())
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed or unknown request parameters
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A single-resource lookup matched no rows
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// The store failed to execute the query
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Builds a validation error from a single issue.
    pub fn invalid(issue: Issue) -> Self {
        Self::Validation(ValidationErrors {
            issues: vec![issue],
        })
    }

    pub const fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Store(_) => 500,
        }
    }

    /// Shapes this error into the response body handed back to callers.
    pub fn to_response(&self) -> ErrorResponse {
        let (message, issues) = match self {
            Self::Validation(errors) => ("Invalid query parameters".to_string(), errors.issues.clone()),
            Self::NotFound { entity, id } => (
                "Not found".to_string(),
                vec![Issue::new(
                    IssueCode::NotFound,
                    format!("no {entity} matches '{id}'"),
                    [entity.as_str(), id.as_str()],
                )],
            ),
            Self::Store(err) => (err.message.clone(), Vec::new()),
        };

        ErrorResponse {
            status: self.status(),
            message,
            error: ErrorDetail { issues },
        }
    }
}

/// `{status, message, error: {issues: [...]}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub issues: Vec<Issue>,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, QueryError>;
