//! Operator account database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::User;

impl Database {
    /// Insert an account with an already-hashed password, returning its id.
    pub fn insert_user(&self, username: &str, password_hash: &str, role: &str) -> DbResult<i64> {
        self.conn.execute(
            "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
            params![username, password_hash, role],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert an account unless the username is taken. Returns whether a row was added.
    pub fn ensure_user(&self, username: &str, password_hash: &str, role: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "INSERT OR IGNORE INTO users (username, password, role) VALUES (?1, ?2, ?3)",
            params![username, password_hash, role],
        )?;
        Ok(rows_affected > 0)
    }

    /// Look up an account by username.
    pub fn get_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                r#"
                SELECT id, username, password, COALESCE(role, 'admin'), created_at
                FROM users
                WHERE username = ?
                "#,
                [username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        role: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Check whether an account exists.
    pub fn user_exists(&self, username: &str) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?",
            [username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_user("atinukeade", "$2b$04$hash", "admin").unwrap();

        let user = db.get_user_by_username("atinukeade").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, "admin");
        assert_eq!(user.password_hash, "$2b$04$hash");
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_username_unique() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user("atinukeade", "h1", "admin").unwrap();
        assert!(db.insert_user("atinukeade", "h2", "admin").is_err());

        assert!(!db.ensure_user("atinukeade", "h3", "admin").unwrap());
        assert!(db.ensure_user("frontdesk", "h4", "staff").unwrap());
        assert!(db.user_exists("frontdesk").unwrap());

        // First hash kept
        let user = db.get_user_by_username("atinukeade").unwrap().unwrap();
        assert_eq!(user.password_hash, "h1");
    }
}
