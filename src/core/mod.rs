pub mod backup;
pub mod bootstrap;
pub mod edit;
pub mod ledger;
pub mod log;
pub mod migrate;
pub mod stats;
pub mod validator;

pub use ledger::{ClockOutcome, Ledger, PeriodPatch};
