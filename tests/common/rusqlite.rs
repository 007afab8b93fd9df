use inscribe::sqlite::rusqlite::{Connection, params};
use inscribe::sqlite::SqliteStore;

use super::{COLLECTIONS, Fixture};

pub fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    conn.execute_batch(
        "CREATE TABLE collections (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL
        );
        CREATE TABLE inscriptions (
            id INTEGER PRIMARY KEY,
            block_number INTEGER NOT NULL,
            tx_index INTEGER NOT NULL,
            content_sha TEXT NOT NULL,
            collection_id TEXT REFERENCES collections(id),
            is_valid INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX inscriptions_position ON inscriptions (block_number, tx_index);",
    )
    .expect("create tables");
    conn
}

pub fn seed(conn: &Connection, fixture: &Fixture) {
    for c in &COLLECTIONS {
        conn.execute(
            "INSERT INTO collections (id, name, slug) VALUES (?1, ?2, ?3)",
            params![c.id, c.name, c.slug],
        )
        .expect("insert collection");
    }

    for i in &fixture.inscriptions {
        conn.execute(
            "INSERT INTO inscriptions (id, block_number, tx_index, content_sha, collection_id, is_valid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![i.id, i.block_number, i.tx_index, i.content_sha, i.collection_id, i.is_valid],
        )
        .expect("insert inscription");
    }
}

pub fn store(fixture: &Fixture) -> SqliteStore {
    let conn = setup_db();
    seed(&conn, fixture);
    SqliteStore::new(conn)
}
