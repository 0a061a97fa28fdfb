use crate::model::{BalanceSheet, DetailedSplitLine, MemberBalances, MemberName, Money, Payment};

/// Pure share/balance computation. No side effects; idempotent over its
/// inputs.
pub struct SplitCalculator;

impl SplitCalculator {
    /// One split line per payment, with the rounded per-person share.
    pub fn compute_splits(payments: &[Payment]) -> Vec<DetailedSplitLine> {
        payments
            .iter()
            .map(|payment| DetailedSplitLine {
                item: payment.item.clone(),
                amount: payment.amount,
                participants: payment.participants.clone(),
                per_person: payment.amount.split_among(payment.participants.len()),
                payer: payment.payer.clone(),
            })
            .collect()
    }

    /// Per-member paid/owed totals and net balances, in roster order.
    ///
    /// Totals accumulate exactly and are rounded once at the end, not per
    /// addition, so per-item rounding is the only source of drift.
    pub fn compute_balance_sheet(
        members: &[MemberName],
        splits: &[DetailedSplitLine],
    ) -> BalanceSheet {
        let mut total_paid: MemberBalances = members
            .iter()
            .map(|member| (member.clone(), Money::ZERO))
            .collect();
        let mut total_owed = total_paid.clone();

        for split in splits {
            if let Some(paid) = total_paid.get_mut(&split.payer) {
                *paid += split.amount;
            }
            for participant in &split.participants {
                if let Some(owed) = total_owed.get_mut(participant) {
                    *owed += split.per_person;
                }
            }
        }

        let balances: MemberBalances = members
            .iter()
            .map(|member| {
                let paid = total_paid.get(member).copied().unwrap_or(Money::ZERO);
                let owed = total_owed.get(member).copied().unwrap_or(Money::ZERO);
                (member.clone(), (paid - owed).round_2dp())
            })
            .collect();

        for paid in total_paid.values_mut() {
            *paid = paid.round_2dp();
        }
        for owed in total_owed.values_mut() {
            *owed = owed.round_2dp();
        }

        BalanceSheet {
            total_paid,
            total_owed,
            balances,
        }
    }
}
