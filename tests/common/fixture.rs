use inscribe::prelude::*;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

pub const ROWS: usize = 97;
pub const SEED: u64 = 0x1a5c_2024;
pub const FIRST_BLOCK: i64 = 840_000;

const SHA_PREFIXES: [&str; 4] = ["0xF591", "0xf591", "0xA0B1", "0x7C2E"];

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub id: &'static str,
    pub name: &'static str,
    pub slug: &'static str,
}

pub const COLLECTIONS: [Collection; 3] = [
    Collection {
        id: "bitmap",
        name: "Bitmap",
        slug: "bitmap",
    },
    Collection {
        id: "runestones",
        name: "Runestones",
        slug: "runestones",
    },
    Collection {
        id: "quantum-cats",
        name: "Quantum Cats",
        slug: "quantum_cats",
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Inscription {
    pub id: i64,
    pub block_number: i64,
    pub tx_index: i64,
    pub content_sha: String,
    pub collection_id: Option<&'static str>,
    pub is_valid: bool,
}

impl Inscription {
    pub const fn key(&self) -> (i64, i64) {
        (self.block_number, self.tx_index)
    }

    /// Row as both stores hold it; flags are stored as 0/1.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "block_number": self.block_number,
            "tx_index": self.tx_index,
            "content_sha": self.content_sha,
            "collection_id": self.collection_id,
            "is_valid": i64::from(self.is_valid),
        })
    }
}

/// Deterministic set of inscriptions, kept in shuffled insertion order.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub inscriptions: Vec<Inscription>,
}

impl Fixture {
    pub fn standard() -> Self {
        Self::generate(ROWS, SEED)
    }

    pub fn generate(rows: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let collections: Vec<Option<&'static str>> = core::iter::once(None)
            .chain(COLLECTIONS.iter().map(|c| Some(c.id)))
            .collect();

        let mut inscriptions: Vec<Inscription> = (0..rows)
            .map(|i| {
                let i = i as i64;
                let prefix = SHA_PREFIXES.choose(&mut rng).copied().unwrap_or("0x");
                Inscription {
                    id: 1_000 + i,
                    // three inscriptions per block, sparse tx indexes
                    block_number: FIRST_BLOCK + i / 3,
                    tx_index: (i % 3) * 7,
                    content_sha: format!("{prefix}{:06x}", rng.random_range(0..0x100_0000u32)),
                    collection_id: collections.choose(&mut rng).copied().flatten(),
                    is_valid: rng.random_bool(0.8),
                }
            })
            .collect();
        inscriptions.shuffle(&mut rng);

        Self { inscriptions }
    }

    pub fn memory_store(&self) -> MemoryStore {
        MemoryStore::new()
            .with_table("inscriptions", self.inscriptions.iter().map(Inscription::to_json))
            .with_table(
                "collections",
                COLLECTIONS
                    .iter()
                    .map(|c| json!({ "id": c.id, "name": c.name, "slug": c.slug })),
            )
    }

    pub fn get(&self, id: i64) -> &Inscription {
        self.inscriptions
            .iter()
            .find(|i| i.id == id)
            .unwrap_or_else(|| panic!("no inscription {id} in fixture"))
    }

    /// Ids of matching inscriptions in listing order.
    pub fn expected(&self, direction: SortDirection, filter: impl Fn(&Inscription) -> bool) -> Vec<i64> {
        let mut matching: Vec<&Inscription> = self.inscriptions.iter().filter(|i| filter(i)).collect();
        matching.sort_by_key(|i| i.key());
        if direction == SortDirection::Desc {
            matching.reverse();
        }
        matching.into_iter().map(|i| i.id).collect()
    }

    pub fn count(&self, filter: impl Fn(&Inscription) -> bool) -> u64 {
        self.inscriptions.iter().filter(|i| filter(i)).count() as u64
    }

    pub fn highest_key(&self) -> (i64, i64) {
        self.inscriptions.iter().map(Inscription::key).max().unwrap_or_default()
    }
}

pub fn collection(id: &str) -> Option<&'static Collection> {
    COLLECTIONS.iter().find(|c| c.id == id)
}

pub fn schema() -> EntitySchema {
    EntitySchema::new("inscriptions", "id", CursorKey::new("block_number", "tx_index"))
        .columns(["id", "block_number", "tx_index", "content_sha", "collection_id", "is_valid"])
        .field("block_number", FieldKind::Numeric)
        .field("tx_index", FieldKind::Numeric)
        .field("content_sha", FieldKind::Text)
        .field("collection_id", FieldKind::TriState)
        .field("is_valid", FieldKind::Boolean)
        .relation(Relation::new("collection", "collections", "collection_id", "id").fields(["name", "slug"]))
}
