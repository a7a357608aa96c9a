use redb::TableDefinition;

/// Users table: username -> UserRecord (serialized)
/// Keying by username makes uniqueness a property of the table itself.
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Setcards table: insertion sequence -> SetcardRecord (serialized)
/// The sequence key keeps iteration in insertion order.
pub const SETCARDS: TableDefinition<u64, &[u8]> = TableDefinition::new("Models");
