use std::fmt::Write;

use warikan_domain::{Money, SettlementSummary};
use warikan_i18n as i18n;
use warikan_parser::{ExclusionLine, PaymentLine};

/// Renders the five-section settlement report and the confirmation echoes.
pub struct ReportPresenter;

impl ReportPresenter {
    /// The full report: roster, payment log, split detail, per-member
    /// settlement with its arithmetic shown, transfer list.
    pub fn render(summary: &SettlementSummary) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", i18n::SECTION_MEMBERS);
        let _ = writeln!(out, "{}", join_names(summary.members.iter().map(|m| m.as_str())));

        let _ = writeln!(out, "\n{}", i18n::SECTION_PAYMENTS);
        for payment in &summary.payments {
            let _ = writeln!(
                out,
                "{}",
                i18n::payment_log_line(&payment.payer, payment.amount, &payment.item)
            );
        }

        let _ = writeln!(out, "\n{}", i18n::SECTION_SPLITS);
        for split in &summary.detailed_split {
            let _ = writeln!(out, "{} ${}", split.item, split.amount);
            let _ = writeln!(
                out,
                "- {}{}{}",
                i18n::PARTICIPANTS,
                i18n::LABEL_SEP,
                join_names(split.participants.iter().map(|m| m.as_str()))
            );
            let _ = writeln!(
                out,
                "- {}{}{}{}",
                i18n::PER_PERSON,
                i18n::LABEL_SEP,
                split.per_person,
                i18n::CURRENCY_SUFFIX
            );
        }

        let _ = writeln!(out, "\n{}", i18n::SECTION_SETTLEMENT);
        for member in &summary.members {
            let balance = summary
                .sheet
                .balances
                .get(member)
                .copied()
                .unwrap_or(Money::ZERO);
            let status = if balance > Money::ZERO {
                i18n::OVERPAID
            } else {
                i18n::UNDERPAID
            };
            let _ = writeln!(
                out,
                "{}{}{} {}{}",
                member,
                i18n::LABEL_SEP,
                status,
                balance.abs(),
                i18n::CURRENCY_SUFFIX
            );

            let paid = summary
                .sheet
                .total_paid
                .get(member)
                .copied()
                .unwrap_or(Money::ZERO);
            let shares: Vec<String> = summary
                .detailed_split
                .iter()
                .map(|split| {
                    if split.participants.contains(member) {
                        split.per_person.to_string()
                    } else {
                        "0".to_string()
                    }
                })
                .collect();
            let _ = writeln!(
                out,
                "  {}{}({} - {})",
                i18n::DETAIL_CALC,
                i18n::LABEL_SEP,
                paid,
                shares.join(" - ")
            );
        }

        let _ = writeln!(out, "\n{}", i18n::SECTION_TRANSFERS);
        if summary.transfers.is_empty() {
            let _ = writeln!(out, "{}", i18n::ALREADY_BALANCED);
        } else {
            for transfer in &summary.transfers {
                let _ = writeln!(
                    out,
                    "{}",
                    i18n::transfer_line(&transfer.from, &transfer.to, transfer.amount)
                );
            }
        }

        out
    }

    /// Echo of a parsed roster, shown before confirmation.
    pub fn echo_members(members: &[&str]) -> String {
        format!(
            "{}\n{}",
            i18n::SECTION_MEMBERS,
            join_names(members.iter().copied())
        )
    }

    /// Echo of parsed payment lines.
    pub fn echo_payments(payments: &[PaymentLine<'_>]) -> String {
        let mut out = i18n::SECTION_PAYMENTS.to_string();
        for payment in payments {
            let _ = write!(
                out,
                "\n{}",
                i18n::payment_log_line(payment.payer, Money::new(payment.amount), payment.item)
            );
        }
        out
    }

    /// Echo of parsed exclusion lines; an empty list means an even split.
    pub fn echo_exclusions(exclusions: &[ExclusionLine<'_>]) -> String {
        let mut out = i18n::SECTION_SPLITS.to_string();
        if exclusions.is_empty() {
            let _ = write!(out, "\n-");
            return out;
        }
        for exclusion in exclusions {
            let _ = write!(
                out,
                "\n{}{}{}",
                exclusion.item,
                i18n::LABEL_SEP,
                join_names(exclusion.excluded.iter().copied())
            );
        }
        out
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(i18n::MEMBER_JOIN)
}
