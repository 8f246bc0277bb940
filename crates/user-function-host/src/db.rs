//! SQLite-backed user store
//!
//! Every statement opens its own connection and drops it before returning,
//! so nothing is shared between requests except the database file.

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use user_function_sdk::{Statement, StoreError, UserStore};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        city TEXT,
        age INTEGER
    );
"#;

/// SQLite database holding the `users` table
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Point at a database file, creating its directory if needed
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory {:?}", dir))?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Create the `users` table when it does not exist yet
    pub fn migrate(&self) -> Result<()> {
        let conn = Connection::open(&self.path)
            .with_context(|| format!("Failed to open database at {:?}", self.path))?;
        conn.execute_batch(SCHEMA)
            .context("Failed to create users table")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))
    }
}

impl UserStore for Database {
    fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        let conn = self.connect()?;

        let sqlite_params: Vec<rusqlite::types::Value> = statement
            .params
            .iter()
            .map(json_to_sqlite_value)
            .collect();

        let param_refs: Vec<&dyn rusqlite::ToSql> = sqlite_params
            .iter()
            .map(|v| v as &dyn rusqlite::ToSql)
            .collect();

        let affected = conn
            .execute(&statement.sql, param_refs.as_slice())
            .map_err(|e| StoreError::Statement(e.to_string()))?;

        Ok(affected as u64)
    }
}

/// Convert a JSON parameter to a SQLite value
fn json_to_sqlite_value(value: &serde_json::Value) -> rusqlite::types::Value {
    match value {
        serde_json::Value::Null => rusqlite::types::Value::Null,
        serde_json::Value::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                rusqlite::types::Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                rusqlite::types::Value::Real(f)
            } else {
                rusqlite::types::Value::Null
            }
        }
        serde_json::Value::String(s) => rusqlite::types::Value::Text(s.clone()),
        other => rusqlite::types::Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn temp_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("nested").join("users.db")).unwrap();
        db.migrate().unwrap();
        (dir, db)
    }

    fn count_users(db: &Database) -> i64 {
        let conn = Connection::open(db.path()).unwrap();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_insert_update_delete() {
        let (_dir, db) = temp_db();

        let inserted = db
            .execute(&Statement::new(
                "INSERT INTO users (first_name, last_name, city, age) VALUES (?, ?, ?, ?)",
                vec![json!("John"), json!("Dawson"), json!("Oslo"), json!(41)],
            ))
            .unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(count_users(&db), 1);

        let updated = db
            .execute(&Statement::new(
                "UPDATE users SET first_name=?, last_name=?, city=?, age=? WHERE id=?",
                vec![json!("Jane"), json!("Dawson"), json!("Bergen"), json!(39), json!(1)],
            ))
            .unwrap();
        assert_eq!(updated, 1);

        let conn = Connection::open(db.path()).unwrap();
        let (first, city, age): (String, String, i64) = conn
            .query_row(
                "SELECT first_name, city, age FROM users WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!((first.as_str(), city.as_str(), age), ("Jane", "Bergen", 39));

        let deleted = db
            .execute(&Statement::new("DELETE FROM users WHERE id=?", vec![json!(1)]))
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(count_users(&db), 0);
    }

    #[test]
    fn test_unknown_id_affects_nothing() {
        let (_dir, db) = temp_db();
        let affected = db
            .execute(&Statement::new("DELETE FROM users WHERE id=?", vec![json!(404)]))
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[test]
    fn test_name_only_insert_leaves_city_and_age_null() {
        let (_dir, db) = temp_db();
        db.execute(&Statement::new(
            "INSERT INTO users (first_name, last_name) VALUES (?, ?)",
            vec![json!("John"), json!("Dawson")],
        ))
        .unwrap();

        let conn = Connection::open(db.path()).unwrap();
        let city: Option<String> = conn
            .query_row("SELECT city FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(city, None);
    }

    #[test]
    fn test_bad_statement_is_store_error() {
        let (_dir, db) = temp_db();
        let err = db
            .execute(&Statement::new("INSERT INTO people (name) VALUES (?)", vec![json!("x")]))
            .unwrap_err();
        assert!(matches!(err, StoreError::Statement(_)));
    }

    #[test]
    fn test_missing_database_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("never-migrated.db")).unwrap();
        let err = db
            .execute(&Statement::new("DELETE FROM users WHERE id=?", vec![json!(1)]))
            .unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailed(_)));
    }
}
