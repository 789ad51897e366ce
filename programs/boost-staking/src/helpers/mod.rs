pub mod boost;
pub mod cpi;
pub mod fixed;
pub mod ledger;
pub mod math;
