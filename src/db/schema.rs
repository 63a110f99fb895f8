//! Store bootstrap: pool connection and the idempotent schema DDL.
//!
//! The production store is materialized by the batch loader; this module
//! exists so test suites and empty environments can stand up the same shape.
//! Every statement is `IF NOT EXISTS`, so running it against a loaded store
//! is harmless.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::Result;

/// Opens the store pool and applies the connection pragmas.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    debug!("store pool connected");
    Ok(pool)
}

const DOMESTIC_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS tm_applications (
        app_num TEXT PRIMARY KEY,
        filing_date TEXT,
        reg_date TEXT,
        reg_num TEXT,
        status TEXT
    )",
    "CREATE TABLE IF NOT EXISTS tm_display_texts (
        app_num TEXT NOT NULL,
        source TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        text TEXT NOT NULL,
        canonical TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tm_phonetics (
        app_num TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        reading TEXT NOT NULL,
        canonical TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tm_mark_keys (
        app_num TEXT NOT NULL,
        key TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tm_classes (
        app_num TEXT NOT NULL,
        class_num TEXT NOT NULL,
        similar_groups TEXT,
        goods_text TEXT,
        canonical_goods TEXT
    )",
    "CREATE TABLE IF NOT EXISTS tm_similar_groups (
        app_num TEXT NOT NULL,
        code TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tm_applicants (
        app_num TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        code TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tm_rights_holders (
        app_num TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        name TEXT NOT NULL,
        canonical_name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tm_images (
        app_num TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        path TEXT NOT NULL
    )",
];

const PARTY_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS party_master (
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        canonical_name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS party_partial (
        code TEXT NOT NULL,
        name TEXT NOT NULL,
        canonical_name TEXT NOT NULL,
        appearance_count INTEGER NOT NULL DEFAULT 0
    )",
];

const INTERNATIONAL_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS intl_registrations (
        intl_reg_num TEXT PRIMARY KEY,
        filing_date TEXT,
        reg_date TEXT,
        status TEXT
    )",
    "CREATE TABLE IF NOT EXISTS intl_display_texts (
        intl_reg_num TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        text TEXT NOT NULL,
        canonical TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS intl_phonetics (
        intl_reg_num TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        reading TEXT NOT NULL,
        canonical TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS intl_mark_keys (
        intl_reg_num TEXT NOT NULL,
        key TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS intl_classes (
        intl_reg_num TEXT NOT NULL,
        class_num TEXT NOT NULL,
        similar_groups TEXT,
        goods_text TEXT,
        canonical_goods TEXT
    )",
    "CREATE TABLE IF NOT EXISTS intl_similar_groups (
        intl_reg_num TEXT NOT NULL,
        code TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS intl_holders (
        intl_reg_num TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        name TEXT NOT NULL,
        canonical_name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS intl_images (
        intl_reg_num TEXT NOT NULL,
        seq INTEGER NOT NULL DEFAULT 0,
        path TEXT NOT NULL
    )",
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_tm_applications_reg_num ON tm_applications(reg_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_display_texts_app ON tm_display_texts(app_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_display_texts_canonical ON tm_display_texts(canonical)",
    "CREATE INDEX IF NOT EXISTS idx_tm_phonetics_app ON tm_phonetics(app_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_phonetics_canonical ON tm_phonetics(canonical)",
    "CREATE INDEX IF NOT EXISTS idx_tm_mark_keys_app ON tm_mark_keys(app_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_mark_keys_key ON tm_mark_keys(key)",
    "CREATE INDEX IF NOT EXISTS idx_tm_classes_app ON tm_classes(app_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_classes_class ON tm_classes(class_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_classes_goods ON tm_classes(canonical_goods)",
    "CREATE INDEX IF NOT EXISTS idx_tm_similar_groups_app ON tm_similar_groups(app_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_similar_groups_code ON tm_similar_groups(code)",
    "CREATE INDEX IF NOT EXISTS idx_tm_applicants_app ON tm_applicants(app_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_applicants_code ON tm_applicants(code)",
    "CREATE INDEX IF NOT EXISTS idx_tm_rights_holders_app ON tm_rights_holders(app_num)",
    "CREATE INDEX IF NOT EXISTS idx_tm_rights_holders_name ON tm_rights_holders(canonical_name)",
    "CREATE INDEX IF NOT EXISTS idx_tm_images_app ON tm_images(app_num)",
    "CREATE INDEX IF NOT EXISTS idx_party_partial_code ON party_partial(code)",
    "CREATE INDEX IF NOT EXISTS idx_intl_display_texts_reg ON intl_display_texts(intl_reg_num)",
    "CREATE INDEX IF NOT EXISTS idx_intl_display_texts_canonical ON intl_display_texts(canonical)",
    "CREATE INDEX IF NOT EXISTS idx_intl_phonetics_reg ON intl_phonetics(intl_reg_num)",
    "CREATE INDEX IF NOT EXISTS idx_intl_phonetics_canonical ON intl_phonetics(canonical)",
    "CREATE INDEX IF NOT EXISTS idx_intl_mark_keys_reg ON intl_mark_keys(intl_reg_num)",
    "CREATE INDEX IF NOT EXISTS idx_intl_mark_keys_key ON intl_mark_keys(key)",
    "CREATE INDEX IF NOT EXISTS idx_intl_classes_reg ON intl_classes(intl_reg_num)",
    "CREATE INDEX IF NOT EXISTS idx_intl_classes_class ON intl_classes(class_num)",
    "CREATE INDEX IF NOT EXISTS idx_intl_classes_goods ON intl_classes(canonical_goods)",
    "CREATE INDEX IF NOT EXISTS idx_intl_similar_groups_reg ON intl_similar_groups(intl_reg_num)",
    "CREATE INDEX IF NOT EXISTS idx_intl_similar_groups_code ON intl_similar_groups(code)",
    "CREATE INDEX IF NOT EXISTS idx_intl_holders_reg ON intl_holders(intl_reg_num)",
    "CREATE INDEX IF NOT EXISTS idx_intl_holders_name ON intl_holders(canonical_name)",
    "CREATE INDEX IF NOT EXISTS idx_intl_images_reg ON intl_images(intl_reg_num)",
];

/// Creates every table and index the engine reads. Idempotent.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in DOMESTIC_TABLES
        .iter()
        .chain(PARTY_TABLES)
        .chain(INTERNATIONAL_TABLES)
        .chain(INDEXES)
    {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("register schema ready");
    Ok(())
}
