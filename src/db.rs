use crate::classifier::{default_mappings, CertificationMapping};
use crate::error::{LedgerError, LedgerResult};
use crate::tier::{BadgeStatus, Tier};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

/// Observed certification credential.
/// Created by the record/import path only, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub tier: Tier,
    pub issue_date: String,
    pub expiry_date: String,
    /// Frozen at record time, never re-derived from `expiry_date`
    pub status: BadgeStatus,
    pub points: f64,

    /// When this badge was first recorded
    pub recorded_at: DateTime<Utc>,
}

impl Badge {
    pub fn new(
        name: &str,
        tier: Tier,
        issue_date: &str,
        expiry_date: &str,
        status: BadgeStatus,
        points: f64,
    ) -> Self {
        Badge {
            name: name.to_string(),
            tier,
            issue_date: issue_date.to_string(),
            expiry_date: expiry_date.to_string(),
            status,
            points,
            recorded_at: Utc::now(),
        }
    }

    /// Idempotency key for duplicate detection over `(name, issue_date)`.
    pub fn idempotency_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update([0x1f]);
        hasher.update(self.issue_date.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }
}

/// Durable badge and mapping tables over one SQLite connection.
///
/// Opened once at process start and borrowed by everything that needs it.
pub struct BadgeStore {
    conn: Connection,
}

impl BadgeStore {
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened badge store");
        BadgeStore::from_connection(conn)
    }

    pub fn open_in_memory() -> LedgerResult<Self> {
        BadgeStore::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> LedgerResult<Self> {
        setup_database(&conn)?;
        let seeded = seed_default_mappings(&conn)?;
        if seeded > 0 {
            info!(mappings = seeded, "seeded default certification mappings");
        }
        Ok(BadgeStore { conn })
    }

    // ========================================================================
    // MAPPINGS
    // ========================================================================

    /// All mappings in insertion order.
    pub fn mappings(&self) -> LedgerResult<Vec<CertificationMapping>> {
        let mut stmt = self
            .conn
            .prepare("SELECT keyword, tier FROM certification_mappings ORDER BY id ASC")?;

        let mappings = stmt
            .query_map([], |row| {
                let tier: String = row.get(1)?;
                Ok(CertificationMapping {
                    keyword: row.get(0)?,
                    tier: Tier::from_label(&tier),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(mappings)
    }

    /// Insert a mapping. Existing keywords are left untouched and yield `false`.
    pub fn add_mapping(&self, mapping: &CertificationMapping) -> LedgerResult<bool> {
        if mapping.keyword.is_empty() {
            return Err(LedgerError::invalid("mapping keyword is empty"));
        }
        // An Unknown mapping would stop the keyword fallback from ever running
        if mapping.tier == Tier::Unknown {
            return Err(LedgerError::invalid(format!(
                "mapping `{}` must name a tier other than Unknown",
                mapping.keyword
            )));
        }

        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO certification_mappings (keyword, tier) VALUES (?1, ?2)",
            params![mapping.keyword, mapping.tier.as_str()],
        )?;

        Ok(changed > 0)
    }

    // ========================================================================
    // BADGES
    // ========================================================================

    /// Persist `badge` unless one with the same `(name, issue_date)` exists.
    pub fn insert_if_absent(&self, badge: &Badge) -> LedgerResult<bool> {
        let key = badge.idempotency_key();

        let result = self.conn.execute(
            "INSERT INTO badges (
                idempotency_key, name, tier, issue_date, expiry_date, status, points, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                key,
                badge.name,
                badge.tier.as_str(),
                badge.issue_date,
                badge.expiry_date,
                badge.status.as_str(),
                badge.points,
                badge.recorded_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                debug!(name = %badge.name, tier = %badge.tier, "badge inserted");
                Ok(true)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                debug!(name = %badge.name, issue_date = %badge.issue_date, "duplicate badge skipped");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Every badge, points descending then name ascending.
    pub fn list_all(&self) -> LedgerResult<Vec<Badge>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, tier, issue_date, expiry_date, status, points, recorded_at
             FROM badges
             ORDER BY points DESC, name ASC",
        )?;

        let badges = stmt
            .query_map([], badge_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(badges)
    }

    pub fn badge_count(&self) -> LedgerResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM badges", [], |row| row.get(0))?;

        Ok(count)
    }
}

fn badge_from_row(row: &Row<'_>) -> rusqlite::Result<Badge> {
    let tier: String = row.get(1)?;
    let status: String = row.get(4)?;
    let recorded_at: String = row.get(6)?;

    let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Badge {
        name: row.get(0)?,
        tier: Tier::from_label(&tier),
        issue_date: row.get(2)?,
        expiry_date: row.get(3)?,
        status: BadgeStatus::from_label(&status),
        points: row.get(5)?,
        recorded_at,
    })
}

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS badges (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            idempotency_key TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            tier TEXT NOT NULL,
            issue_date TEXT NOT NULL,
            expiry_date TEXT NOT NULL,
            status TEXT NOT NULL,
            points REAL NOT NULL,
            recorded_at TEXT NOT NULL,
            UNIQUE(name, issue_date)
        )",
        [],
    )?;

    // Row id order is the mapping iteration order
    conn.execute(
        "CREATE TABLE IF NOT EXISTS certification_mappings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            keyword TEXT UNIQUE NOT NULL,
            tier TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_badges_points_name ON badges(points DESC, name ASC)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_badges_status ON badges(status)",
        [],
    )?;

    Ok(())
}

/// Seed the default mappings when the table is empty. Returns rows inserted.
pub fn seed_default_mappings(conn: &Connection) -> rusqlite::Result<usize> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM certification_mappings", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for mapping in default_mappings() {
        inserted += conn.execute(
            "INSERT OR IGNORE INTO certification_mappings (keyword, tier) VALUES (?1, ?2)",
            params![mapping.keyword, mapping.tier.as_str()],
        )?;
    }

    Ok(inserted)
}
