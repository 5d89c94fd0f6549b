/// Raw input line text as delivered by the input-splitting collaborator.
/// Example: `u1,p1,click,30,2024-01-01T00:00:00`
pub type RawLine = String;
/// User identifier carried in field 0 (never empty in a valid record).
/// Example: `u1`
pub type SubjectId = String;
/// Object/product identifier carried in field 1 (unvalidated).
/// Example: `p1`
pub type ObjectId = String;
/// Opaque event timestamp text carried in field 4 (presence-checked only).
/// Example: `2024-01-01T00:00:00`
pub type EventTime = String;
/// Grouping key counts are aggregated by (here: the object id).
/// Example: `p1`
pub type GroupKey = String;
/// Name of a job counter as surfaced in snapshots.
/// Example: `InvalidFieldCount`
pub type CounterName = &'static str;
