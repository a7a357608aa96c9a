//! Setcard store operations

use redb::{Database, ReadableTable};
use uuid::Uuid;

use crate::db::tables;
use crate::error::Result;
use crate::models::{NewSetcard, SetcardRecord};

/// Every setcard, in insertion order
pub fn list_setcards(db: &Database) -> Result<Vec<SetcardRecord>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::SETCARDS)?;

    let mut setcards = Vec::new();
    for entry in table.iter()? {
        let (_, bytes) = entry?;
        setcards.push(bincode::deserialize(bytes.value())?);
    }

    Ok(setcards)
}

/// Assign an id and append the setcard after the current last key
pub fn insert_setcard(db: &Database, setcard: NewSetcard) -> Result<SetcardRecord> {
    let record = setcard.with_id(Uuid::new_v4().to_string());
    let bytes = bincode::serialize(&record)?;

    let write_txn = db.begin_write()?;
    {
        let mut table = write_txn.open_table(tables::SETCARDS)?;

        let next_key = match table.last()? {
            Some((key, _)) => key.value() + 1,
            None => 0,
        };

        table.insert(next_key, bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok(record)
}
