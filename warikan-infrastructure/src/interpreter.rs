use warikan_application::{InterpretError, TextInterpreter};
use warikan_parser::{
    EXCLUSION_MARKERS, MEMBER_MARKERS, PAYMENT_MARKERS, has_all_sections, parse_exclusion_lines,
    parse_payment_lines,
};

/// Rule-based normalizer: strips blank lines, passes marked payloads
/// through, and sorts unmarked lines into the three canonical sections
/// by their grammar. No external assistant involved.
#[derive(Default)]
pub struct StrictFormatInterpreter;

impl TextInterpreter for StrictFormatInterpreter {
    fn interpret(&self, text: &str) -> Result<String, InterpretError> {
        let cleaned = clean_text(text);
        if has_all_sections(&cleaned) {
            return Ok(cleaned);
        }
        classify_lines(&cleaned)
    }
}

fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn classify_lines(cleaned: &str) -> Result<String, InterpretError> {
    let mut members = Vec::new();
    let mut payments = Vec::new();
    let mut exclusions = Vec::new();

    for line in cleaned.lines() {
        if parse_payment_lines(line).is_ok_and(|parsed| !parsed.is_empty()) {
            payments.push(line);
        } else if !parse_exclusion_lines(line).is_empty() {
            exclusions.push(line);
        } else if !line.chars().any(|c| c.is_ascii_digit()) {
            // No amount anywhere, so treat it as roster text.
            members.push(line);
        } else {
            return Err(InterpretError::Unintelligible(line.to_string()));
        }
    }

    if members.is_empty() || payments.is_empty() {
        return Err(InterpretError::Unintelligible(cleaned.to_string()));
    }

    Ok(format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        MEMBER_MARKERS[1],
        members.join("\n"),
        PAYMENT_MARKERS[1],
        payments.join("\n"),
        EXCLUSION_MARKERS[1],
        exclusions.join("\n"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn marked_payload_passes_through_with_blank_lines_stripped() {
        let input = "[Members]\n\nAlice, Bob\n\n[Payments]\nAlice paid 100 for lunch\n\n[Exclusions]\n";
        let normalized = StrictFormatInterpreter.interpret(input).unwrap();
        assert!(!normalized.contains("\n\n"));
        assert!(has_all_sections(&normalized));
    }

    #[test]
    fn unmarked_lines_are_sorted_into_sections() {
        let input = "Alice、Bob、Charlie\n\
                     Alice paid 300 for dinner\n\
                     dinner excludes Charlie";
        let normalized = StrictFormatInterpreter.interpret(input).unwrap();
        assert!(has_all_sections(&normalized));

        let sections = warikan_parser::split_into_sections(&normalized).unwrap();
        assert!(sections.members.contains("Alice、Bob、Charlie"));
        assert!(sections.payments.contains("paid 300"));
        assert!(sections.exclusions.contains("excludes Charlie"));
    }

    #[rstest]
    #[case::digits_without_grammar("meet at 7pm")]
    #[case::no_payments_at_all("Alice、Bob")]
    fn unintelligible_input_is_rejected(#[case] input: &str) {
        assert!(StrictFormatInterpreter.interpret(input).is_err());
    }
}
