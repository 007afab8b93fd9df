//! # inscribe
//!
//! Dynamic filtering, keyset pagination and response shaping for read APIs.
//!
//! ## Quick Start
//!
//! ```rust
//! use inscribe::prelude::*;
//! use serde_json::json;
//!
//! let schema = EntitySchema::new("inscriptions", "id", CursorKey::new("block_number", "tx_index"))
//!     .columns(["id", "block_number", "tx_index", "content_sha"])
//!     .field("block_number", FieldKind::Numeric)
//!     .field("content_sha", FieldKind::Text);
//!
//! let store = MemoryStore::new().with_table(
//!     "inscriptions",
//!     [json!({ "id": 1, "block_number": 840000, "tx_index": 0, "content_sha": "0xF591aa" })],
//! );
//!
//! let params = RawParams::from_query_string("content_sha=0xF591*&exclude=tx_index");
//! let page = Engine::default().list(&store, &schema, &params)?;
//! assert_eq!(page.pagination.total(), 1);
//! assert!(page.data[0].get("tx_index").is_none());
//! # Ok::<(), inscribe::QueryError>(())
//! ```
//!
//! ## Stores
//!
//! | Store         | Feature Flag | Notes                               |
//! |---------------|--------------|-------------------------------------|
//! | `MemoryStore` | always       | JSON rows held in memory            |
//! | `SqliteStore` | `rusqlite`   | one statement per request, bundled  |

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for engine operations
pub use inscribe_core::error::Result;

pub use inscribe_core::{Engine, EngineConfig, QueryError, RawParams, ResultPage};

/// Error types
pub mod error {
    pub use inscribe_core::error::{
        ErrorDetail, ErrorResponse, Issue, IssueCode, QueryError, StoreError, ValidationErrors,
    };
}

/// Engine components, usable on their own.
pub mod core {
    pub use inscribe_core::{config, expand, filter, page, params, projection, query, schema, store};
}

// =============================================================================
// SQLite module
// =============================================================================

/// SQLite store and SQL rendering.
#[cfg(feature = "rusqlite")]
pub mod sqlite {
    pub use inscribe_sqlite::{SQL, SQLChunk, SQLiteValue, SqliteStore, Token, render, rusqlite};
}

/// Everything needed to describe an entity and run requests against it.
pub mod prelude {
    pub use inscribe_core::{
        CursorKey, CursorMeta, Engine, EngineConfig, EntitySchema, FieldKind, MemoryStore, OffsetMeta,
        PaginationMeta, QueryError, QueryRequest, RawParams, Relation, ResultPage, SortDirection, Store,
    };

    #[cfg(feature = "rusqlite")]
    pub use inscribe_sqlite::SqliteStore;
}
