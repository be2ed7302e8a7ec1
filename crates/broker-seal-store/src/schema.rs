//! SQL for the certificate table.
//!
//! The table is an append-only provenance log; there is no primary key.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Name of the certificate table.
pub const TABLE_NAME: &str = "entity_certificates";

pub(crate) const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "entity_certificates" (
        entity      text                      NOT NULL,
        create_time timestamp with time zone  NOT NULL,
        public_key  text                      NOT NULL  -- hex-encoded raw public key bytes
    )
"#;

pub(crate) const INSERT_CERTIFICATE: &str = r#"
    INSERT INTO "entity_certificates" (entity, create_time, public_key)
    VALUES (?1, ?2, ?3)
"#;

pub(crate) const SELECT_BY_ENTITY: &str = r#"
    SELECT entity, create_time, public_key
    FROM "entity_certificates"
    WHERE entity = ?1
    ORDER BY rowid
"#;

/// Create the certificate table if it is missing.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_TABLE, [])
        .map_err(|e| StoreError::Schema(e.to_string()))?;
    Ok(())
}
