//! Credential store operations

use redb::{Database, ReadableTable, ReadableTableMetadata};

use crate::db::tables;
use crate::error::{AppError, Result};
use crate::models::UserRecord;

/// Insert a new user, failing if the username is already taken
///
/// The existence check and the insert share one write transaction, and redb
/// allows a single writer at a time, so two concurrent registrations of the
/// same name cannot both succeed.
pub fn insert_user(db: &Database, record: &UserRecord) -> Result<()> {
    let write_txn = db.begin_write()?;
    {
        let mut table = write_txn.open_table(tables::USERS)?;

        if table.get(record.username.as_str())?.is_some() {
            return Err(AppError::UserAlreadyExists);
        }

        let bytes = bincode::serialize(record)?;
        table.insert(record.username.as_str(), bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok(())
}

/// Look up a user by username
pub fn find_user(db: &Database, username: &str) -> Result<Option<UserRecord>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::USERS)?;

    let record = table
        .get(username)?
        .map(|bytes| bincode::deserialize(bytes.value()))
        .transpose()?;

    Ok(record)
}

/// Number of registered users
pub fn count_users(db: &Database) -> Result<u64> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::USERS)?;
    Ok(table.len()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db(temp_dir: &TempDir) -> Database {
        let db = Database::create(temp_dir.path().join("users.db")).unwrap();
        crate::db::init_tables(&db).unwrap();
        db
    }

    fn record(username: &str) -> UserRecord {
        UserRecord::new(
            uuid::Uuid::new_v4().to_string(),
            username.to_string(),
            "hash".to_string(),
            1733788800,
        )
    }

    #[test]
    fn test_insert_and_find() {
        let temp_dir = TempDir::new().unwrap();
        let db = test_db(&temp_dir);

        insert_user(&db, &record("alice")).unwrap();

        let found = find_user(&db, "alice").unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(find_user(&db, "bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_leaves_store_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let db = test_db(&temp_dir);

        let first = record("alice");
        insert_user(&db, &first).unwrap();

        let result = insert_user(&db, &record("alice"));
        assert!(matches!(result, Err(AppError::UserAlreadyExists)));

        assert_eq!(count_users(&db).unwrap(), 1);
        assert_eq!(find_user(&db, "alice").unwrap().unwrap().id, first.id);
    }
}
