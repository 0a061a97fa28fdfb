pub mod split_calculator;
pub mod transfer_planner;

pub use split_calculator::SplitCalculator;
pub use transfer_planner::{TransferPlanner, settlement_epsilon};
