use redb::TableDefinition;

/// Users table: user id -> UserRecord (serialized)
pub const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Unique-email index: lowercased email -> user id
/// Looked up inside the registration write transaction, which is what
/// enforces email uniqueness.
pub const USERS_BY_EMAIL: TableDefinition<&str, u64> = TableDefinition::new("users_by_email");

/// Tokens table: SHA-256 digest of a bearer token -> user id
/// The plaintext token exists only on the client.
pub const TOKENS: TableDefinition<&str, u64> = TableDefinition::new("tokens");

/// Videos table: video id -> VideoRecord (serialized)
pub const VIDEOS: TableDefinition<u64, &[u8]> = TableDefinition::new("videos");

/// Purchases table: (user id, video id) -> PurchaseRecord (serialized)
/// The composite key makes a duplicate entitlement unrepresentable.
pub const PURCHASES: TableDefinition<(u64, u64), &[u8]> = TableDefinition::new("purchases");

/// Counters table: entity name -> next id to hand out
pub const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");
