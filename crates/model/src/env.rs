/// Environment variable naming the table which holds the counter record
pub const COUNTER_TABLE_NAME: &'static str = "COUNTER_TABLE_NAME";
/// Table name used when the environment variable is unset
pub const DEFAULT_COUNTER_TABLE: &'static str = "counters";
