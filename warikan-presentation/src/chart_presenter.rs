use warikan_domain::{Money, SettlementSummary};
use warikan_i18n as i18n;

use crate::svg_table::{Align, SvgTable, document};

const TABLE_GAP: u32 = 16;

/// Renders a settlement summary as one SVG document: a per-member
/// balance table, followed by the transfer plan when there is one.
pub struct ChartPresenter;

impl ChartPresenter {
    pub fn render_svg(summary: &SettlementSummary) -> String {
        let mut balance_table = SvgTable::new([
            (i18n::TABLE_MEMBER, Align::Left),
            (i18n::TABLE_PAID, Align::Right),
            (i18n::TABLE_OWED, Align::Right),
            (i18n::TABLE_BALANCE, Align::Right),
        ]);
        for member in &summary.members {
            let paid = summary
                .sheet
                .total_paid
                .get(member)
                .copied()
                .unwrap_or(Money::ZERO);
            let owed = summary
                .sheet
                .total_owed
                .get(member)
                .copied()
                .unwrap_or(Money::ZERO);
            let balance = summary
                .sheet
                .balances
                .get(member)
                .copied()
                .unwrap_or(Money::ZERO);
            balance_table.push_row([
                member.to_string(),
                paid.to_string(),
                owed.to_string(),
                signed(balance),
            ]);
        }

        let transfer_table = (!summary.transfers.is_empty()).then(|| {
            let mut table = SvgTable::new([
                (i18n::TABLE_FROM, Align::Left),
                (i18n::TABLE_TO, Align::Left),
                (i18n::TABLE_AMOUNT, Align::Right),
            ]);
            for transfer in &summary.transfers {
                table.push_row([
                    transfer.from.to_string(),
                    transfer.to.to_string(),
                    transfer.amount.to_string(),
                ]);
            }
            table
        });

        let width = transfer_table
            .as_ref()
            .map_or(balance_table.width(), |t| t.width().max(balance_table.width()));
        let height = balance_table.height()
            + transfer_table
                .as_ref()
                .map_or(0, |t| t.height() + TABLE_GAP);

        let mut body = String::new();
        balance_table.render_into(&mut body, 0);
        if let Some(table) = &transfer_table {
            table.render_into(&mut body, balance_table.height() + TABLE_GAP);
        }
        document(width, height, &body)
    }
}

fn signed(amount: Money) -> String {
    if amount > Money::ZERO {
        format!("+{amount}")
    } else {
        amount.to_string()
    }
}
