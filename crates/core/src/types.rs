/// Lock codes and devices are keyed by UUID in the upstream API.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC. Offsets present on the wire are normalized on parse.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
