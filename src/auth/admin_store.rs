//! Admin Credential Storage
//! Mission: Securely store the admin account with SQLite

use crate::auth::models::Admin;
use anyhow::{Context, Result};
use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{info, warn};
use uuid::Uuid;

/// Admin credential store with SQLite backend
pub struct AdminStore {
    db_path: String,
}

impl AdminStore {
    /// Create a new admin store and initialize the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS admins (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Seed the bootstrap admin account if it does not exist yet.
    ///
    /// Returns true when a fresh account was created. The generated hash is
    /// never logged.
    pub fn ensure_default_admin(&self, username: &str, password: &str) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM admins WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .context("Failed to check for admin account")?;

        if count > 0 {
            info!("Admin account already exists (username: {})", username);
            return Ok(false);
        }

        let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;

        let admin = Admin {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            created_at: Utc::now().to_rfc3339(),
        };

        conn.execute(
            "INSERT INTO admins (id, username, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                admin.id.to_string(),
                admin.username,
                admin.password_hash,
                admin.created_at,
            ],
        )
        .context("Failed to insert admin account")?;

        info!("🔐 Default admin account created (username: {})", username);
        warn!("⚠️  CHANGE DEFAULT PASSWORD IN PRODUCTION!");

        Ok(true)
    }

    /// Get an admin account by username (exact match)
    pub fn find_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, created_at
             FROM admins WHERE username = ?1",
        )?;

        let admin_result = stmt.query_row(params![username], |row| {
            let id: String = row.get(0)?;
            Ok(Admin {
                id: Uuid::parse_str(&id)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                created_at: row.get(3)?,
            })
        });

        match admin_result {
            Ok(admin) => Ok(Some(admin)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcrypt::verify;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (AdminStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = AdminStore::new(db_path).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_default_admin_created() {
        let (store, _temp) = create_test_store();

        assert!(store.ensure_default_admin("admin", "admin123").unwrap());

        let admin = store.find_by_username("admin").unwrap();
        assert!(admin.is_some());

        let admin = admin.unwrap();
        assert_eq!(admin.username, "admin");
        assert!(verify("admin123", &admin.password_hash).unwrap());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (store, _temp) = create_test_store();

        assert!(store.ensure_default_admin("admin", "admin123").unwrap());
        // Second seed must not create or replace anything
        assert!(!store.ensure_default_admin("admin", "other-password").unwrap());

        let admin = store.find_by_username("admin").unwrap().unwrap();
        assert!(verify("admin123", &admin.password_hash).unwrap());
        assert!(!verify("other-password", &admin.password_hash).unwrap());
    }

    #[test]
    fn test_nonexistent_username() {
        let (store, _temp) = create_test_store();
        store.ensure_default_admin("admin", "admin123").unwrap();

        assert!(store.find_by_username("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_hash_is_salted_per_call() {
        // Two hashes of the same plaintext must differ (distinct salts)
        // while both still verify.
        let hash1 = hash("admin123", DEFAULT_COST).unwrap();
        let hash2 = hash("admin123", DEFAULT_COST).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify("admin123", &hash1).unwrap());
        assert!(verify("admin123", &hash2).unwrap());
        assert!(!verify("wrong", &hash1).unwrap());
    }

    #[test]
    fn test_stored_hash_is_not_plaintext() {
        let (store, _temp) = create_test_store();
        store.ensure_default_admin("admin", "admin123").unwrap();

        let admin = store.find_by_username("admin").unwrap().unwrap();
        assert_ne!(admin.password_hash, "admin123");
    }
}
