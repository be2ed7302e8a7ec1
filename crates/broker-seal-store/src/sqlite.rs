//! SQLite implementation of the certificate store.
//!
//! The connection target is a database file path, or `:memory:` for an
//! in-process database. Creation times are stored as ISO-8601 text.

use std::path::Path;

use rusqlite::{params, Connection};

use broker_seal_core::CreateTimeZone;

use crate::certificate::Certificate;
use crate::error::{Result, StoreError};
use crate::schema;
use crate::traits::{CertificateStore, StoreConnector};

/// Connection target that opens a private in-memory database.
pub const MEMORY_TARGET: &str = ":memory:";

/// SQLite-backed certificate store.
///
/// Owns its connection; the connection is closed when the store is closed
/// or dropped.
pub struct SqliteCertificateStore {
    conn: Connection,
    zone: CreateTimeZone,
}

impl SqliteCertificateStore {
    /// Open the database at `target`.
    pub fn open(target: &str, zone: CreateTimeZone) -> Result<Self> {
        let opened = if target == MEMORY_TARGET {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(target))
        };

        let conn = opened.map_err(|e| StoreError::Connect {
            target: target.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(connection_target = target, %zone, "opened certificate store");
        Ok(Self { conn, zone })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::open(MEMORY_TARGET, CreateTimeZone::Utc)
    }

    /// The zone creation times are rendered in.
    pub fn zone(&self) -> CreateTimeZone {
        self.zone
    }
}

impl CertificateStore for SqliteCertificateStore {
    fn ensure_schema(&mut self) -> Result<()> {
        schema::ensure_schema(&self.conn)
    }

    fn insert(&mut self, certificate: &Certificate) -> Result<()> {
        let create_time = self
            .zone
            .format(certificate.create_time)
            .map_err(|e| StoreError::Insert(e.to_string()))?;

        self.conn
            .execute(
                schema::INSERT_CERTIFICATE,
                params![certificate.entity, create_time, certificate.public_key],
            )
            .map_err(|e| StoreError::Insert(e.to_string()))?;

        tracing::debug!(
            entity = %certificate.entity,
            %create_time,
            "certificate recorded"
        );
        Ok(())
    }

    fn certificates_for(&self, entity: &str) -> Result<Vec<Certificate>> {
        let mut stmt = self.conn.prepare(schema::SELECT_BY_ENTITY)?;
        let rows = stmt
            .query_map(params![entity], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(entity, create_time, public_key)| {
                let create_time = self
                    .zone
                    .parse(&create_time)
                    .map_err(|e| StoreError::InvalidData(e.to_string()))?;
                Ok(Certificate {
                    entity,
                    create_time,
                    public_key,
                })
            })
            .collect()
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| StoreError::Database(e))
    }
}

/// Opens [`SqliteCertificateStore`] handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector {
    zone: CreateTimeZone,
}

impl SqliteConnector {
    pub fn new(zone: CreateTimeZone) -> Self {
        Self { zone }
    }
}

impl StoreConnector for SqliteConnector {
    type Store = SqliteCertificateStore;

    fn connect(&self, target: &str) -> Result<Self::Store> {
        SqliteCertificateStore::open(target, self.zone)
    }
}
