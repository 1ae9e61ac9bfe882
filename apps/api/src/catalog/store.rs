//! PostgreSQL persistence for the journal catalog.
//!
//! The table is written only at startup (schema + idempotent seed) and read
//! once to build the in-memory `Catalog` snapshot.

use sqlx::PgPool;
use tracing::info;

use super::{Catalog, CatalogError};
use crate::models::journal::Journal;

const CREATE_JOURNALS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS journals (
    id              TEXT PRIMARY KEY,
    position        INTEGER NOT NULL,
    name            TEXT NOT NULL,
    abbreviation    TEXT NOT NULL,
    publisher       TEXT NOT NULL,
    impact_factor   DOUBLE PRECISION NOT NULL,
    scope           TEXT NOT NULL,
    subjects        TEXT[] NOT NULL DEFAULT '{}',
    open_access     BOOLEAN NOT NULL DEFAULT FALSE,
    review_time     TEXT NOT NULL,
    acceptance_rate DOUBLE PRECISION NOT NULL,
    website         TEXT NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub async fn ensure_schema(pool: &PgPool) -> Result<(), CatalogError> {
    sqlx::query(CREATE_JOURNALS_TABLE).execute(pool).await?;
    Ok(())
}

/// Inserts seed journals that are not yet present. Existing rows are left
/// untouched. Returns the number of rows inserted.
pub async fn seed_journals(pool: &PgPool, journals: &[Journal]) -> Result<u64, CatalogError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    // New journals go after whatever is already stored.
    let (offset,): (i32,) = sqlx::query_as("SELECT COALESCE(MAX(position) + 1, 0) FROM journals")
        .fetch_one(&mut *tx)
        .await?;

    for (i, journal) in journals.iter().enumerate() {
        let result = sqlx::query(
            r#"
            INSERT INTO journals
                (id, position, name, abbreviation, publisher, impact_factor, scope,
                 subjects, open_access, review_time, acceptance_rate, website)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&journal.id)
        .bind(offset + i as i32)
        .bind(&journal.name)
        .bind(&journal.abbreviation)
        .bind(&journal.publisher)
        .bind(journal.impact_factor)
        .bind(&journal.scope)
        .bind(&journal.subjects)
        .bind(journal.open_access)
        .bind(&journal.review_time)
        .bind(journal.acceptance_rate)
        .bind(&journal.website)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    info!("Seeded {inserted} new journal(s)");
    Ok(inserted)
}

/// Reads every journal in catalog insertion order.
pub async fn load_journals(pool: &PgPool) -> Result<Vec<Journal>, CatalogError> {
    let journals = sqlx::query_as::<_, Journal>(
        r#"
        SELECT id, name, abbreviation, publisher, impact_factor, scope, subjects,
               open_access, review_time, acceptance_rate, website
        FROM journals
        ORDER BY position, id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(journals)
}

/// Creates the schema, optionally seeds it, and snapshots the table.
pub async fn load_catalog(
    pool: &PgPool,
    seed: Option<&[Journal]>,
) -> Result<Catalog, CatalogError> {
    ensure_schema(pool).await?;
    if let Some(journals) = seed {
        seed_journals(pool, journals).await?;
    }
    let journals = load_journals(pool).await?;
    info!("Loaded {} journal(s) from the database", journals.len());
    Catalog::new(journals)
}
