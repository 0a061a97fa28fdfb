use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use smol_str::SmolStr;

use crate::services::{SplitCalculator, TransferPlanner};

pub type MemberName = SmolStr;

/// Per-member signed amounts, in original roster order. The ordering is
/// semantic: it is the tie-break source for the transfer planner.
pub type MemberBalances = IndexMap<MemberName, Money>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Rounds to two decimal places, half away from zero (matching the
    /// rounding the rest of the pipeline assumes).
    pub fn round_2dp(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Equal share of this amount among `count` participants, rounded to
    /// two decimal places. Zero participants yield a zero share.
    pub fn split_among(self, count: usize) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        Self(self.0 / Decimal::from(count as u64)).round_2dp()
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl fmt::Display for Money {
    /// Integer rendering when the fractional part is zero, otherwise two
    /// decimal places with trailing zeros trimmed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.round_2dp().0.normalize())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub payer: MemberName,
    pub amount: Money,
    pub item: SmolStr,
    /// Who owes a share. Initialized to the full roster, narrowed by
    /// exclusions; always a subset of the ledger's members.
    pub participants: Vec<MemberName>,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailedSplitLine {
    pub item: SmolStr,
    pub amount: Money,
    pub participants: Vec<MemberName>,
    pub per_person: Money,
    pub payer: MemberName,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    pub total_paid: MemberBalances,
    pub total_owed: MemberBalances,
    /// paid − owed, rounded once at the end. Positive = net creditor.
    pub balances: MemberBalances,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: MemberName,
    pub to: MemberName,
    pub amount: Money,
}

/// Everything the report presenter and chart renderer need.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettlementSummary {
    pub members: Vec<MemberName>,
    pub payments: Vec<Payment>,
    pub detailed_split: Vec<DetailedSplitLine>,
    pub sheet: BalanceSheet,
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("unknown payer '{name}' at line {line}")]
    UnknownPayer { name: String, line: usize },
    #[error("unknown item '{item}' at line {line}")]
    UnknownItem { item: String, line: usize },
}

/// Validated members + payments for one settlement round. Grammar errors
/// stay in the parser crate; reference errors (unknown payer, unknown item)
/// are caught here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseLedger {
    members: Vec<MemberName>,
    payments: Vec<Payment>,
}

impl ExpenseLedger {
    pub fn new(members: Vec<MemberName>) -> Self {
        Self {
            members,
            payments: Vec::new(),
        }
    }

    pub fn members(&self) -> &[MemberName] {
        &self.members
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Records one payment; the payer must be a known member and the
    /// participant set starts as the full roster.
    pub fn add_payment(
        &mut self,
        payer: &str,
        amount: Money,
        item: &str,
        line: usize,
    ) -> Result<(), LedgerError> {
        if !self.members.iter().any(|m| m == payer) {
            return Err(LedgerError::UnknownPayer {
                name: payer.to_string(),
                line,
            });
        }

        self.payments.push(Payment {
            payer: MemberName::new(payer),
            amount,
            item: SmolStr::new(item),
            participants: self.members.clone(),
            line,
        });
        Ok(())
    }

    /// Removes the named members from the item's participant set. Excluded
    /// names that are not participants are silently skipped; an unknown
    /// item is an error.
    pub fn exclude(
        &mut self,
        item: &str,
        excluded: &[&str],
        line: usize,
    ) -> Result<(), LedgerError> {
        let excluded_lookup: fxhash::FxHashSet<&str> = excluded.iter().copied().collect();
        let mut found = false;

        for payment in self.payments.iter_mut().filter(|p| p.item == item) {
            found = true;
            payment
                .participants
                .retain(|member| !excluded_lookup.contains(member.as_str()));
        }

        if !found {
            return Err(LedgerError::UnknownItem {
                item: item.to_string(),
                line,
            });
        }
        Ok(())
    }

    /// Runs the full pipeline: per-item shares, per-member balance sheet,
    /// greedy transfer plan.
    pub fn settle(&self) -> SettlementSummary {
        let detailed_split = SplitCalculator::compute_splits(&self.payments);
        let sheet = SplitCalculator::compute_balance_sheet(&self.members, &detailed_split);
        let transfers = TransferPlanner::plan(&sheet.balances);

        tracing::debug!(
            members = self.members.len(),
            payments = self.payments.len(),
            transfers = transfers.len(),
            "settlement computed"
        );

        SettlementSummary {
            members: self.members.clone(),
            payments: self.payments.clone(),
            detailed_split,
            sheet,
            transfers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap())
    }

    #[rstest]
    #[case::whole("300.00", "300")]
    #[case::fraction("50.50", "50.5")]
    #[case::two_places("33.33", "33.33")]
    #[case::rounds("33.335", "33.34")]
    #[case::negative("-0.50", "-0.5")]
    fn money_display_trims(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(money(input).to_string(), expected);
    }

    #[rstest]
    #[case::thirds("100", 3, "33.33")]
    #[case::exact("300", 2, "150")]
    #[case::empty("300", 0, "0")]
    fn money_split_among(#[case] amount: &str, #[case] count: usize, #[case] expected: &str) {
        assert_eq!(money(amount).split_among(count), money(expected));
    }

    #[test]
    fn add_payment_rejects_unknown_payer() {
        let mut ledger =
            ExpenseLedger::new(vec![MemberName::new("Alice"), MemberName::new("Bob")]);
        let err = ledger
            .add_payment("Mallory", money("10"), "dinner", 2)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnknownPayer {
                name: "Mallory".to_string(),
                line: 2,
            }
        );
        assert!(ledger.payments().is_empty());
    }

    #[test]
    fn exclude_narrows_participants() {
        let mut ledger = ExpenseLedger::new(vec![
            MemberName::new("Alice"),
            MemberName::new("Bob"),
            MemberName::new("Charlie"),
        ]);
        ledger.add_payment("Alice", money("300"), "dinner", 1).unwrap();
        ledger.exclude("dinner", &["Charlie"], 1).unwrap();

        assert_eq!(
            ledger.payments()[0].participants,
            vec![MemberName::new("Alice"), MemberName::new("Bob")]
        );
    }

    #[test]
    fn exclude_rejects_unknown_item() {
        let mut ledger = ExpenseLedger::new(vec![MemberName::new("Alice")]);
        ledger.add_payment("Alice", money("10"), "dinner", 1).unwrap();
        let err = ledger.exclude("breakfast", &["Alice"], 3).unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnknownItem {
                item: "breakfast".to_string(),
                line: 3,
            }
        );
    }
}
