#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    BalanceSheet, DetailedSplitLine, ExpenseLedger, LedgerError, MemberBalances, MemberName,
    Money, Payment, SettlementSummary, Transfer,
};
pub use services::{SplitCalculator, TransferPlanner, settlement_epsilon};
