//! Request entry point: parse, plan, execute once, then shape the rows.

use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::{QueryError, Result};
use crate::filter::{Comparison, FilterValue, Predicate};
use crate::page::{self, PaginationMeta, ResultPage};
use crate::params::RawParams;
use crate::projection::Projection;
use crate::query::{self, QueryRequest};
use crate::schema::EntitySchema;
use crate::store::{PageBound, Store, StoreQuery, StoreRows};

/// Entry point tying parsing, planning, execution and projection together.
///
/// Holds configuration only; every call is independent, so one engine can be
/// shared across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parses `params` for `schema` without touching a store.
    pub fn parse(&self, schema: &EntitySchema, params: &RawParams) -> Result<QueryRequest> {
        query::parse(schema, params, &self.config)
    }

    /// Parses and runs a list request.
    pub fn list<S: Store + ?Sized>(&self, store: &S, schema: &EntitySchema, params: &RawParams) -> Result<ResultPage> {
        let request = self.parse(schema, params)?;
        self.run(store, schema, &request)
    }

    /// Runs an already parsed list request.
    pub fn run<S: Store + ?Sized>(&self, store: &S, schema: &EntitySchema, request: &QueryRequest) -> Result<ResultPage> {
        let planned = page::plan(schema, request)?;
        crate::inscribe_trace_query!(schema.name, planned.predicates.len(), request.pagination.mode());

        let rows = execute(store, schema, &planned)?;
        let pagination = PaginationMeta::from_rows(&request.pagination, &schema.cursor_key, &rows);
        crate::inscribe_trace_page!(schema.name, rows.rows.len(), rows.total);

        Ok(ResultPage {
            pagination,
            data: project(request, rows),
        })
    }

    /// Fetches the single record whose id field equals `id`.
    ///
    /// `params` may carry `expand`, `include`, `exclude` and filters; filters
    /// are ANDed with the id match. Pagination parameters are validated but
    /// have no effect.
    pub fn find_one<S: Store + ?Sized>(
        &self,
        store: &S,
        schema: &EntitySchema,
        id: &str,
        params: &RawParams,
    ) -> Result<Value> {
        let request = self.parse(schema, params)?;
        let not_found = || QueryError::NotFound {
            entity: schema.name.clone(),
            id: id.to_string(),
        };

        // An id that cannot be typed for its field cannot match a row.
        let value = match schema.field_kind(&schema.id_field) {
            Some(kind) => FilterValue::parse(kind, id).map_err(|_| not_found())?,
            None => id
                .parse::<i64>()
                .map_or_else(|_| FilterValue::Text(id.to_string()), FilterValue::Integer),
        };

        let mut planned = page::plan(schema, &request)?;
        planned.predicates.insert(
            0,
            Predicate::Compare {
                field: schema.id_field.clone(),
                cmp: Comparison::Eq,
                value,
            },
        );
        planned.limit = 1;
        planned.bound = PageBound::Offset(0);
        crate::inscribe_trace_query!(schema.name, planned.predicates.len(), "single");

        let rows = execute(store, schema, &planned)?;
        project(&request, rows).into_iter().next().ok_or_else(not_found)
    }
}

fn execute<S: Store + ?Sized>(store: &S, schema: &EntitySchema, query: &StoreQuery) -> Result<StoreRows> {
    store.execute(query).map_err(|err| {
        crate::inscribe_trace_store_error!(schema.name, err);
        QueryError::Store(err)
    })
}

fn project(request: &QueryRequest, rows: StoreRows) -> Vec<Value> {
    let projection = Projection::new(&request.include, &request.exclude);
    rows.rows
        .into_iter()
        .map(|record| projection.apply_owned(Value::Object(record)))
        .collect()
}
