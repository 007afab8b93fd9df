//! Check command - validates configuration against the database

use inscribe_core::EntitySchema;
use inscribe_sqlite::SqliteStore;

use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Prints a report and returns `true` when every entity checks out.
pub fn run(config: &Config, store: Option<&SqliteStore>) -> Result<bool, CliError> {
    println!("{}", output::heading("Checking configuration..."));
    println!();
    println!("  {}: {}", output::label("Database"), config.database_path().display());
    println!(
        "  {}: default {}, max {}",
        output::label("Page size"),
        config.engine.default_page_size,
        config.engine.max_page_size
    );

    if config.entities.is_empty() {
        println!();
        println!("  {}", output::warning("No entities configured"));
        return Ok(true);
    }

    let mut ok = true;
    for entity in &config.entities {
        println!();
        print!("  {} {}... ", output::label("Entity"), entity.name);

        let Some(store) = store else {
            println!("{}", output::muted("not verified (no database)"));
            describe(entity);
            continue;
        };

        let missing = missing_columns(store, entity)?;
        if missing.is_empty() {
            println!("{}", output::status_ok());
        } else {
            println!("{}", output::status_error());
            for problem in &missing {
                println!("    {}", output::err_line(problem));
            }
            ok = false;
        }
        describe(entity);
    }

    println!();
    if ok {
        println!("{}", output::success("Configuration is valid"));
    }
    Ok(ok)
}

fn describe(entity: &EntitySchema) {
    println!(
        "    {}: {} ({}, {})",
        output::muted("table"),
        entity.table,
        entity.cursor_key.primary,
        entity.cursor_key.secondary
    );
    for field in &entity.fields {
        println!("    {} {}", output::muted(field.kind.as_str()), field.name);
    }
    for relation in &entity.relations {
        println!(
            "    {} {} -> {}.{}",
            output::muted("expand"),
            relation.name,
            relation.table,
            relation.foreign_key
        );
    }
}

/// Columns the entity refers to that its tables do not have.
pub fn missing_columns(store: &SqliteStore, entity: &EntitySchema) -> Result<Vec<String>, CliError> {
    let mut required: Vec<&str> = entity.columns.iter().map(String::as_str).collect();
    required.extend(entity.fields.iter().map(|f| f.name.as_str()));
    required.extend([
        entity.id_field.as_str(),
        entity.cursor_key.primary.as_str(),
        entity.cursor_key.secondary.as_str(),
    ]);
    required.extend(entity.relations.iter().map(|r| r.local_key.as_str()));

    let mut problems = Vec::new();
    match table_columns(store, &entity.table)? {
        None => problems.push(format!("table '{}' does not exist", entity.table)),
        Some(columns) => {
            required.sort_unstable();
            required.dedup();
            problems.extend(
                required
                    .into_iter()
                    .filter(|c| !columns.iter().any(|have| have == *c))
                    .map(|c| format!("column '{}.{c}' does not exist", entity.table)),
            );
        }
    }

    for relation in &entity.relations {
        match table_columns(store, &relation.table)? {
            None => problems.push(format!(
                "relation '{}': table '{}' does not exist",
                relation.name, relation.table
            )),
            Some(columns) => problems.extend(
                core::iter::once(&relation.foreign_key)
                    .chain(&relation.fields)
                    .filter(|c| !columns.contains(*c))
                    .map(|c| format!("relation '{}': column '{}.{c}' does not exist", relation.name, relation.table)),
            ),
        }
    }
    Ok(problems)
}

fn table_columns(store: &SqliteStore, table: &str) -> Result<Option<Vec<String>>, CliError> {
    let columns = store.with_connection(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let names = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>();
        names
    })?;
    Ok((!columns.is_empty()).then_some(columns))
}
