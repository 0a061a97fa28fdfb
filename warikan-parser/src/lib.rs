#![warn(clippy::uninlined_format_args)]

//! Line grammar for expense payloads.
//!
//! Three record kinds, each accepted in both surface languages:
//! member rosters (`Alice, Bob` / `Alice、Bob`), payment lines
//! (`Alice paid 300 for dinner` / `Alice付了300元晚餐`) and exclusion lines
//! (`dinner excludes Charlie` / `晚餐沒Charlie`), plus the three-section
//! payload splitter. Output borrows from the input; errors carry 1-based
//! line numbers.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till1, take_until},
    character::complete::multispace1,
    combinator::rest,
};
use rust_decimal::Decimal;
use std::{collections::HashSet, fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLine<'a> {
    pub line: usize,
    pub payer: &'a str,
    pub amount: Decimal,
    pub item: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionLine<'a> {
    pub line: usize,
    pub item: &'a str,
    pub excluded: Vec<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Members,
    Payments,
    Exclusions,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Members => "Members",
            Section::Payments => "Payments",
            Section::Exclusions => "Exclusions",
        };
        f.write_str(name)
    }
}

/// Bodies of the three sections, in fixed order, zero-copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<'a> {
    pub members: &'a str,
    pub payments: &'a str,
    pub exclusions: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("member list is empty")]
    EmptyMemberList,
    #[error("duplicate members: {}", .names.join(", "))]
    DuplicateMembers { names: Vec<String> },
    #[error("malformed payment at line {line}: {detail}")]
    MalformedPaymentLine { line: usize, detail: String },
    #[error("invalid amount '{raw}' at line {line}")]
    InvalidAmount { line: usize, raw: String },
    #[error("missing sections: {}", join_sections(.missing))]
    MissingSections { missing: Vec<Section> },
}

fn join_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(Section::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// Separators accepted between member names: ideographic comma, ASCII comma,
// fullwidth comma, newline.
fn is_member_separator(c: char) -> bool {
    matches!(c, '、' | ',' | '，' | '\n' | '\r')
}

fn strip_roster_prefix(text: &str) -> &str {
    for prefix in ["成員有", "成員：", "members are", "members:"] {
        if let Some(head) = text.get(..prefix.len())
            && head.eq_ignore_ascii_case(prefix)
        {
            return text[prefix.len()..].trim_start();
        }
    }
    text
}

/// Parses a member roster into names in input order.
///
/// Fails when the roster is empty or contains duplicates; duplicates are
/// enumerated in the error, each once, in input order.
pub fn parse_members(text: &str) -> Result<Vec<&str>, ParseError> {
    let body = strip_roster_prefix(text.trim());
    let members: Vec<&str> = body
        .split(is_member_separator)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    if members.is_empty() {
        return Err(ParseError::EmptyMemberList);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(members.len());
    let mut duplicates: Vec<String> = Vec::new();
    for &name in &members {
        if !seen.insert(name) && !duplicates.iter().any(|d| d == name) {
            duplicates.push(name.to_string());
        }
    }
    if !duplicates.is_empty() {
        return Err(ParseError::DuplicateMembers { names: duplicates });
    }

    Ok(members)
}

struct RawPayment<'a> {
    payer: &'a str,
    raw_amount: &'a str,
    item: &'a str,
}

// {payer}付了{amount}元{item}
fn payment_zh(input: &str) -> IResult<&str, RawPayment<'_>> {
    (take_until("付了"), tag("付了"), take_until("元"), tag("元"), rest)
        .map(|(payer, _, raw_amount, _, item): (&str, _, &str, _, &str)| RawPayment {
            payer: payer.trim(),
            raw_amount: raw_amount.trim(),
            item: item.trim(),
        })
        .parse(input)
}

// {payer} paid {amount} for {item}
fn payment_en(input: &str) -> IResult<&str, RawPayment<'_>> {
    (
        take_till1(char::is_whitespace),
        multispace1,
        tag_no_case("paid"),
        multispace1,
        take_till1(char::is_whitespace),
        multispace1,
        tag_no_case("for"),
        multispace1,
        rest,
    )
        .map(
            |(payer, _, _, _, raw_amount, _, _, _, item): (
                &str,
                _,
                _,
                _,
                &str,
                _,
                _,
                _,
                &str,
            )| RawPayment {
                payer,
                raw_amount,
                item: item.trim(),
            },
        )
        .parse(input)
}

fn payment(input: &str) -> IResult<&str, RawPayment<'_>> {
    alt((payment_zh, payment_en)).parse(input)
}

/// Parses payment lines, one record per non-blank line.
///
/// Grammar errors only; whether the payer is a known member is checked by
/// the ledger, not here.
pub fn parse_payment_lines(text: &str) -> Result<Vec<PaymentLine<'_>>, ParseError> {
    let mut payments = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let raw = match payment(line) {
            Ok((_, raw)) => raw,
            Err(_) => {
                return Err(ParseError::MalformedPaymentLine {
                    line: line_no,
                    detail: format!(
                        "expected '<payer> paid <amount> for <item>', got '{line}'"
                    ),
                });
            }
        };

        if raw.payer.is_empty() || raw.item.is_empty() {
            return Err(ParseError::MalformedPaymentLine {
                line: line_no,
                detail: format!("missing payer or item in '{line}'"),
            });
        }

        let amount = match Decimal::from_str(raw.raw_amount) {
            Ok(amount) if amount >= Decimal::ZERO => amount,
            _ => {
                return Err(ParseError::InvalidAmount {
                    line: line_no,
                    raw: raw.raw_amount.to_string(),
                });
            }
        };

        payments.push(PaymentLine {
            line: line_no,
            payer: raw.payer,
            amount,
            item: raw.item,
        });
    }

    Ok(payments)
}

// {item}沒{members}
fn exclusion_zh(input: &str) -> IResult<&str, (&str, &str)> {
    (take_until("沒"), tag("沒"), rest)
        .map(|(item, _, excluded): (&str, _, &str)| (item.trim(), excluded))
        .parse(input)
}

// {item} excludes {members}
fn exclusion_en(input: &str) -> IResult<&str, (&str, &str)> {
    (take_until("excludes"), tag("excludes"), rest)
        .map(|(item, _, excluded): (&str, _, &str)| (item.trim(), excluded))
        .parse(input)
}

/// Parses exclusion lines. Lines without an exclusion marker are no-ops,
/// so this never fails; whether the item exists is checked by the ledger.
pub fn parse_exclusion_lines(text: &str) -> Vec<ExclusionLine<'_>> {
    let mut exclusions = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok((_, (item, excluded_text))) =
            alt((exclusion_zh, exclusion_en)).parse(line)
        {
            let excluded: Vec<&str> = excluded_text
                .split(is_member_separator)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .collect();
            exclusions.push(ExclusionLine {
                line: idx + 1,
                item,
                excluded,
            });
        }
    }

    exclusions
}

pub const MEMBER_MARKERS: [&str; 2] = ["【一、成員名單】", "[Members]"];
pub const PAYMENT_MARKERS: [&str; 2] = ["【二、付款記錄】", "[Payments]"];
pub const EXCLUSION_MARKERS: [&str; 2] = ["【三、分攤情況】", "[Exclusions]"];

fn find_marker<'a>(text: &'a str, aliases: &[&str]) -> Option<(usize, usize)> {
    aliases
        .iter()
        .filter_map(|alias| text.find(alias).map(|start| (start, start + alias.len())))
        .min_by_key(|(start, _)| *start)
}

/// Splits a full payload into its three section bodies.
///
/// Markers must appear in roster/payments/exclusions order; any marker not
/// found after its predecessor is reported as missing.
pub fn split_into_sections(text: &str) -> Result<Sections<'_>, ParseError> {
    let mut missing = Vec::new();

    let members_marker = find_marker(text, &MEMBER_MARKERS);
    if members_marker.is_none() {
        missing.push(Section::Members);
    }
    let after_members = members_marker.map_or(0, |(_, end)| end);

    let payments_marker =
        find_marker(&text[after_members..], &PAYMENT_MARKERS).map(|(start, end)| {
            (start + after_members, end + after_members)
        });
    if payments_marker.is_none() {
        missing.push(Section::Payments);
    }
    let after_payments = payments_marker.map_or(after_members, |(_, end)| end);

    let exclusions_marker =
        find_marker(&text[after_payments..], &EXCLUSION_MARKERS).map(|(start, end)| {
            (start + after_payments, end + after_payments)
        });
    if exclusions_marker.is_none() {
        missing.push(Section::Exclusions);
    }

    let (
        Some((_, members_end)),
        Some((payments_start, payments_end)),
        Some((exclusions_start, exclusions_end)),
    ) = (members_marker, payments_marker, exclusions_marker)
    else {
        return Err(ParseError::MissingSections { missing });
    };

    Ok(Sections {
        members: &text[members_end..payments_start],
        payments: &text[payments_end..exclusions_start],
        exclusions: &text[exclusions_end..],
    })
}

/// True when all three section markers are present in order.
pub fn has_all_sections(text: &str) -> bool {
    split_into_sections(text).is_ok()
}

/// Cheap check that free text plausibly describes expenses at all,
/// used to gate interpretation attempts.
pub fn looks_like_expense_input(text: &str) -> bool {
    text.contains("付了")
        || text.contains('沒')
        || text.to_ascii_lowercase().contains("paid")
        || text.to_ascii_lowercase().contains("excludes")
}
