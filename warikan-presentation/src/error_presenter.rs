use warikan_domain::LedgerError;
use warikan_i18n as i18n;
use warikan_parser::ParseError;

pub fn format_parse_error(error: &ParseError) -> String {
    match error {
        ParseError::EmptyMemberList => i18n::empty_member_list(),
        ParseError::DuplicateMembers { names } => {
            i18n::duplicate_members(names.join(i18n::MEMBER_JOIN))
        }
        ParseError::MalformedPaymentLine { line, detail } => {
            i18n::malformed_payment_line(*line, detail)
        }
        ParseError::InvalidAmount { line, raw } => i18n::invalid_amount(*line, raw),
        ParseError::MissingSections { missing } => {
            let names = missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(i18n::MEMBER_JOIN);
            i18n::missing_sections(names)
        }
    }
}

pub fn format_ledger_error(error: &LedgerError) -> String {
    match error {
        LedgerError::UnknownPayer { name, line } => i18n::unknown_payer(name, *line),
        LedgerError::UnknownItem { item, line } => i18n::unknown_item(item, *line),
    }
}
