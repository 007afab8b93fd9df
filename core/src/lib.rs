pub mod config;
pub mod engine;
pub mod error;
pub mod expand;
pub mod filter;
pub mod page;
pub mod params;
pub mod projection;
pub mod query;
pub mod schema;
pub mod store;
pub mod tracing;

// Re-export key types and traits
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{ErrorResponse, Issue, IssueCode, QueryError, Result, StoreError, ValidationErrors};
pub use expand::JoinSpec;
pub use filter::{Comparison, FilterOperator, FilterSpec, FilterValue, Predicate};
pub use page::{CursorMeta, OffsetMeta, PaginationMeta, ResultPage};
pub use params::RawParams;
pub use projection::{PathPattern, Projection};
pub use query::{CursorSpec, OffsetSpec, Pagination, QueryRequest, SortDirection, SortSpec};
pub use schema::{CursorKey, EntitySchema, FieldDef, FieldKind, Relation};
pub use store::{KeysetBound, MemoryStore, PageBound, Record, Store, StoreQuery, StoreRows};
