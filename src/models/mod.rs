pub mod day_record;
pub mod legacy_event;
pub mod migration_state;
pub mod period;
pub mod period_type;
pub mod serde_fmt;
