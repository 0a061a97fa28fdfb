use warikan_domain::{ExpenseLedger, MemberName, Money};
use warikan_i18n as i18n;
use warikan_parser::{
    ExclusionLine, PaymentLine, has_all_sections, parse_exclusion_lines, parse_members,
    parse_payment_lines, split_into_sections,
};
use warikan_presentation::{ReportPresenter, format_ledger_error, format_parse_error};

use crate::{
    ports::{ChartRenderer, MessageSink, TextInterpreter},
    session::{PendingInput, SessionContext, SessionStep, SessionStore, Stage},
};

const RETRY_LIMIT: u32 = 3;
const REJECT_THRESHOLD: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollectionPolicy {
    /// Parse failures are reported back verbatim.
    #[default]
    Strict,
    /// Parse failures are first routed through the `TextInterpreter`.
    AssistantAssisted,
}

/// Per-stage choice of collection policy, fixed at construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkflowPolicy {
    pub members: CollectionPolicy,
    pub payments: CollectionPolicy,
    pub exclusions: CollectionPolicy,
}

impl WorkflowPolicy {
    pub const fn assistant_assisted() -> Self {
        Self {
            members: CollectionPolicy::AssistantAssisted,
            payments: CollectionPolicy::AssistantAssisted,
            exclusions: CollectionPolicy::AssistantAssisted,
        }
    }

    fn for_stage(self, stage: Stage) -> CollectionPolicy {
        match stage {
            Stage::Members => self.members,
            Stage::Payments => self.payments,
            Stage::Exclusions => self.exclusions,
        }
    }
}

struct TurnOutput {
    reply: String,
    pushes: Vec<String>,
}

impl TurnOutput {
    fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            pushes: Vec::new(),
        }
    }
}

/// The per-user conversation state machine. Each turn produces exactly
/// one reply; chart links and failure notices go out as pushes.
pub struct ConversationController<'a> {
    sessions: SessionStore,
    interpreter: Option<&'a dyn TextInterpreter>,
    renderer: &'a dyn ChartRenderer,
    policy: WorkflowPolicy,
}

impl<'a> ConversationController<'a> {
    pub fn new(
        interpreter: Option<&'a dyn TextInterpreter>,
        renderer: &'a dyn ChartRenderer,
        policy: WorkflowPolicy,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            interpreter,
            renderer,
            policy,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn handle_message(&self, user_id: &str, text: &str, sink: &mut dyn MessageSink) {
        let trimmed = text.trim();
        let output = self.sessions.with_session(user_id, |session| {
            if i18n::is_reset(trimmed) {
                session.reset();
                return TurnOutput::reply(i18n::WELCOME);
            }
            if session.step == SessionStep::Done {
                // A finished round; any new text starts the next one.
                session.reset();
            }
            match session.step {
                SessionStep::Collecting(stage) => self.on_collecting(session, stage, trimmed),
                SessionStep::AwaitingConfirmation(stage) => {
                    self.on_confirmation(session, stage, trimmed)
                }
                SessionStep::ManualFallback => self.on_fallback(session, trimmed),
                SessionStep::Done => self.on_collecting(session, Stage::Members, trimmed),
            }
        });

        sink.reply(output.reply);
        for push in output.pushes {
            sink.push(push);
        }
    }

    fn on_collecting(&self, session: &mut SessionContext, stage: Stage, text: &str) -> TurnOutput {
        if has_all_sections(text) {
            return match Self::build_full_ledger(text) {
                Ok((_, echo)) => Self::accept_full(session, stage, text.to_string(), echo),
                Err((_, message)) => self.stage_failure(session, stage, text, message),
            };
        }

        match Self::echo_stage(session, stage, text) {
            Ok(echo) => Self::accept_stage(session, stage, text.to_string(), echo),
            Err(message) => self.stage_failure(session, stage, text, message),
        }
    }

    fn on_confirmation(
        &self,
        session: &mut SessionContext,
        stage: Stage,
        text: &str,
    ) -> TurnOutput {
        if i18n::is_yes(text) {
            return self.commit_pending(session, stage);
        }

        if i18n::is_no(text) {
            session.reject_count += 1;
            session.pending = None;
            if session.reject_count > REJECT_THRESHOLD {
                tracing::debug!(rejects = session.reject_count, "switching to manual fallback");
                session.step = SessionStep::ManualFallback;
                return TurnOutput::reply(i18n::MANUAL_FALLBACK_INSTRUCTIONS);
            }
            session.step = SessionStep::Collecting(stage);
            return TurnOutput::reply(stage.prompt());
        }

        TurnOutput::reply(i18n::REPROMPT_CONFIRM)
    }

    fn on_fallback(&self, session: &mut SessionContext, text: &str) -> TurnOutput {
        match Self::build_full_ledger(text) {
            Ok((ledger, _)) => self.finish(session, ledger),
            Err((_, message)) => TurnOutput::reply(message),
        }
    }

    fn commit_pending(&self, session: &mut SessionContext, stage: Stage) -> TurnOutput {
        let Some(pending) = session.pending.take() else {
            session.step = SessionStep::Collecting(stage);
            return TurnOutput::reply(stage.prompt());
        };

        match pending {
            PendingInput::Stage {
                stage: Stage::Members,
                raw,
            } => {
                session.members_raw = Some(raw);
                Self::advance_to(session, Stage::Payments)
            }
            PendingInput::Stage {
                stage: Stage::Payments,
                raw,
            } => {
                session.payments_raw = Some(raw);
                Self::advance_to(session, Stage::Exclusions)
            }
            PendingInput::Stage {
                stage: Stage::Exclusions,
                raw,
            } => {
                let members_raw = session.members_raw.take().unwrap_or_default();
                let payments_raw = session.payments_raw.take().unwrap_or_default();
                match Self::build_ledger(&members_raw, &payments_raw, &raw) {
                    Ok((ledger, _)) => self.finish(session, ledger),
                    Err((failed_stage, message)) => {
                        session.members_raw = Some(members_raw);
                        session.payments_raw = Some(payments_raw);
                        Self::return_to_stage(session, failed_stage, message)
                    }
                }
            }
            PendingInput::Full { raw } => match Self::build_full_ledger(&raw) {
                Ok((ledger, _)) => self.finish(session, ledger),
                Err((failed_stage, message)) => {
                    Self::return_to_stage(session, failed_stage, message)
                }
            },
        }
    }

    fn stage_failure(
        &self,
        session: &mut SessionContext,
        stage: Stage,
        text: &str,
        message: String,
    ) -> TurnOutput {
        session.retry_count += 1;

        if self.policy.for_stage(stage) == CollectionPolicy::AssistantAssisted
            && let Some(interpreter) = self.interpreter
        {
            match interpreter.interpret(text) {
                Ok(normalized) => {
                    if has_all_sections(&normalized) {
                        if let Ok((_, echo)) = Self::build_full_ledger(&normalized) {
                            return Self::accept_full(session, stage, normalized, echo);
                        }
                    } else if let Ok(echo) = Self::echo_stage(session, stage, &normalized) {
                        return Self::accept_stage(session, stage, normalized, echo);
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "text interpreter failed");
                }
            }
        }

        if session.retry_count > RETRY_LIMIT {
            session.retry_count = 0;
            session.pending = None;
            session.step = SessionStep::ManualFallback;
            return TurnOutput::reply(i18n::RETRY_EXHAUSTED_INSTRUCTIONS);
        }

        TurnOutput::reply(format!("{message}\n{}", stage.prompt()))
    }

    fn accept_stage(
        session: &mut SessionContext,
        stage: Stage,
        raw: String,
        echo: String,
    ) -> TurnOutput {
        session.retry_count = 0;
        session.pending = Some(PendingInput::Stage { stage, raw });
        session.step = SessionStep::AwaitingConfirmation(stage);
        TurnOutput::reply(format!(
            "{}\n{echo}\n\n{}",
            i18n::PARSED_HEADER,
            i18n::CONFIRM_SUFFIX
        ))
    }

    fn accept_full(
        session: &mut SessionContext,
        stage: Stage,
        raw: String,
        echo: String,
    ) -> TurnOutput {
        session.retry_count = 0;
        session.pending = Some(PendingInput::Full { raw });
        session.step = SessionStep::AwaitingConfirmation(stage);
        TurnOutput::reply(format!(
            "{}\n{echo}\n\n{}",
            i18n::PARSED_HEADER,
            i18n::CONFIRM_SUFFIX
        ))
    }

    fn advance_to(session: &mut SessionContext, stage: Stage) -> TurnOutput {
        session.retry_count = 0;
        session.reject_count = 0;
        session.step = SessionStep::Collecting(stage);
        TurnOutput::reply(stage.prompt())
    }

    fn return_to_stage(
        session: &mut SessionContext,
        stage: Stage,
        message: String,
    ) -> TurnOutput {
        session.retry_count = 0;
        session.reject_count = 0;
        session.step = SessionStep::Collecting(stage);
        TurnOutput::reply(format!("{message}\n{}", stage.prompt()))
    }

    fn finish(&self, session: &mut SessionContext, ledger: ExpenseLedger) -> TurnOutput {
        let summary = ledger.settle();
        let report = format!(
            "{}\n{}",
            i18n::RESULT_HEADER,
            ReportPresenter::render(&summary)
        );

        let mut pushes = Vec::new();
        match self.renderer.render(&summary) {
            Ok(chart) => pushes.push(i18n::chart_ready(chart.url)),
            Err(error) => {
                tracing::warn!(%error, "chart rendering failed");
                pushes.push(i18n::CHART_FAILED.to_string());
            }
        }

        session.ledger = Some(ledger);
        session.pending = None;
        session.members_raw = None;
        session.payments_raw = None;
        session.retry_count = 0;
        session.reject_count = 0;
        session.step = SessionStep::Done;

        TurnOutput {
            reply: report,
            pushes,
        }
    }

    /// Parses and echoes one stage's text. Reference errors (unknown
    /// payer, unknown item) surface here too, checked against the stages
    /// already confirmed, so a bad line is rejected before it is ever
    /// offered for confirmation.
    fn echo_stage(session: &SessionContext, stage: Stage, text: &str) -> Result<String, String> {
        match stage {
            Stage::Members => parse_members(text)
                .map(|members| ReportPresenter::echo_members(&members))
                .map_err(|error| format_parse_error(&error)),
            Stage::Payments => {
                let payments =
                    parse_payment_lines(text).map_err(|error| format_parse_error(&error))?;
                if let Some(members_raw) = &session.members_raw {
                    let (_, mut ledger) = Self::roster_ledger(members_raw)?;
                    Self::apply_payments(&mut ledger, &payments)?;
                }
                Ok(ReportPresenter::echo_payments(&payments))
            }
            Stage::Exclusions => {
                let exclusions = parse_exclusion_lines(text);
                if let (Some(members_raw), Some(payments_raw)) =
                    (&session.members_raw, &session.payments_raw)
                {
                    let (_, mut ledger) = Self::roster_ledger(members_raw)?;
                    let payments = parse_payment_lines(payments_raw)
                        .map_err(|error| format_parse_error(&error))?;
                    Self::apply_payments(&mut ledger, &payments)?;
                    Self::apply_exclusions(&mut ledger, &exclusions)?;
                }
                Ok(ReportPresenter::echo_exclusions(&exclusions))
            }
        }
    }

    fn build_full_ledger(raw: &str) -> Result<(ExpenseLedger, String), (Stage, String)> {
        let sections = split_into_sections(raw)
            .map_err(|error| (Stage::Members, format_parse_error(&error)))?;
        Self::build_ledger(sections.members, sections.payments, sections.exclusions)
    }

    /// Builds a validated ledger from the three section bodies. An error
    /// names the stage whose input needs another pass.
    fn build_ledger(
        members_text: &str,
        payments_text: &str,
        exclusions_text: &str,
    ) -> Result<(ExpenseLedger, String), (Stage, String)> {
        let (members, mut ledger) = Self::roster_ledger(members_text)
            .map_err(|message| (Stage::Members, message))?;
        let payments = parse_payment_lines(payments_text)
            .map_err(|error| (Stage::Payments, format_parse_error(&error)))?;
        let exclusions = parse_exclusion_lines(exclusions_text);

        Self::apply_payments(&mut ledger, &payments)
            .map_err(|message| (Stage::Payments, message))?;
        Self::apply_exclusions(&mut ledger, &exclusions)
            .map_err(|message| (Stage::Exclusions, message))?;

        let echo = [
            ReportPresenter::echo_members(&members),
            ReportPresenter::echo_payments(&payments),
            ReportPresenter::echo_exclusions(&exclusions),
        ]
        .join("\n");
        Ok((ledger, echo))
    }

    fn roster_ledger(members_text: &str) -> Result<(Vec<&str>, ExpenseLedger), String> {
        let members =
            parse_members(members_text).map_err(|error| format_parse_error(&error))?;
        let ledger =
            ExpenseLedger::new(members.iter().map(|name| MemberName::new(name)).collect());
        Ok((members, ledger))
    }

    fn apply_payments(
        ledger: &mut ExpenseLedger,
        payments: &[PaymentLine<'_>],
    ) -> Result<(), String> {
        for payment in payments {
            ledger
                .add_payment(
                    payment.payer,
                    Money::new(payment.amount),
                    payment.item,
                    payment.line,
                )
                .map_err(|error| format_ledger_error(&error))?;
        }
        Ok(())
    }

    fn apply_exclusions(
        ledger: &mut ExpenseLedger,
        exclusions: &[ExclusionLine<'_>],
    ) -> Result<(), String> {
        for exclusion in exclusions {
            ledger
                .exclude(exclusion.item, &exclusion.excluded, exclusion.line)
                .map_err(|error| format_ledger_error(&error))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ChartReference, ChartRenderError, InterpretError};
    use rstest::rstest;
    use warikan_domain::SettlementSummary;

    #[derive(Default)]
    struct RecordingSink {
        replies: Vec<String>,
        pushes: Vec<String>,
    }

    impl MessageSink for RecordingSink {
        fn reply(&mut self, text: String) {
            self.replies.push(text);
        }

        fn push(&mut self, text: String) {
            self.pushes.push(text);
        }
    }

    struct StubRenderer;

    impl ChartRenderer for StubRenderer {
        fn render(&self, _: &SettlementSummary) -> Result<ChartReference, ChartRenderError> {
            Ok(ChartReference {
                url: "http://localhost:5000/chart/test.png".to_string(),
            })
        }
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _: &SettlementSummary) -> Result<ChartReference, ChartRenderError> {
            Err(ChartRenderError::Render("no fonts".to_string()))
        }
    }

    /// Rewrites anything into one fixed canonical payload.
    struct CannedInterpreter(&'static str);

    impl TextInterpreter for CannedInterpreter {
        fn interpret(&self, _: &str) -> Result<String, InterpretError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenInterpreter;

    impl TextInterpreter for BrokenInterpreter {
        fn interpret(&self, text: &str) -> Result<String, InterpretError> {
            Err(InterpretError::Unintelligible(text.to_string()))
        }
    }

    const FULL_PAYLOAD: &str = "[Members]\nAlice, Bob, Charlie\n\
                                [Payments]\nAlice paid 300 for dinner\nBob paid 150 for movie\n\
                                [Exclusions]\ndinner excludes Charlie";

    fn last_reply(sink: &RecordingSink) -> &str {
        sink.replies.last().map(String::as_str).unwrap_or("")
    }

    fn send(controller: &ConversationController<'_>, text: &str) -> RecordingSink {
        let mut sink = RecordingSink::default();
        controller.handle_message("u1", text, &mut sink);
        sink
    }

    fn run_happy_path_to_exclusions(controller: &ConversationController<'_>) {
        send(controller, "Alice, Bob, Charlie");
        send(controller, "yes");
        send(controller, "Alice paid 300 for dinner\nBob paid 150 for movie");
        send(controller, "yes");
        send(controller, "dinner excludes Charlie");
    }

    #[test]
    fn staged_happy_path_reaches_done_with_chart_push() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        let sink = send(&controller, "Alice, Bob, Charlie");
        assert!(last_reply(&sink).contains(i18n::PARSED_HEADER));
        assert!(last_reply(&sink).contains(i18n::CONFIRM_SUFFIX));

        let sink = send(&controller, "yes");
        assert_eq!(last_reply(&sink), i18n::PROMPT_PAYMENTS);

        send(&controller, "Alice paid 300 for dinner\nBob paid 150 for movie");
        send(&controller, "yes");
        send(&controller, "dinner excludes Charlie");
        let sink = send(&controller, "yes");

        assert!(last_reply(&sink).contains(i18n::RESULT_HEADER));
        assert!(last_reply(&sink).contains(i18n::SECTION_TRANSFERS));
        assert_eq!(sink.pushes.len(), 1);
        assert!(sink.pushes[0].contains("http://localhost:5000/chart/test.png"));

        controller
            .sessions()
            .with_session("u1", |s| assert_eq!(s.step, SessionStep::Done));
    }

    #[test]
    fn one_shot_payload_needs_a_single_confirmation() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        let sink = send(&controller, FULL_PAYLOAD);
        assert!(last_reply(&sink).contains(i18n::CONFIRM_SUFFIX));

        let sink = send(&controller, "yes");
        assert!(last_reply(&sink).contains(i18n::RESULT_HEADER));
    }

    #[test]
    fn invalid_amount_keeps_collecting_payments() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        send(&controller, "Alice, Bob");
        send(&controller, "yes");
        let sink = send(&controller, "Alice paid abc for lunch");
        assert!(last_reply(&sink).contains("abc"));

        controller.sessions().with_session("u1", |s| {
            assert_eq!(s.step, SessionStep::Collecting(Stage::Payments));
            assert_eq!(s.retry_count, 1);
        });

        // A corrected line still goes through.
        let sink = send(&controller, "Alice paid 100 for lunch");
        assert!(last_reply(&sink).contains(i18n::CONFIRM_SUFFIX));
    }

    #[test]
    fn third_consecutive_no_switches_to_manual_fallback() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        for rejection in 1..=3u32 {
            send(&controller, "Alice, Bob");
            let sink = send(&controller, "no");
            if rejection < 3 {
                assert_eq!(last_reply(&sink), i18n::PROMPT_MEMBERS);
            } else {
                assert_eq!(last_reply(&sink), i18n::MANUAL_FALLBACK_INSTRUCTIONS);
            }
        }

        controller
            .sessions()
            .with_session("u1", |s| assert_eq!(s.step, SessionStep::ManualFallback));

        // The next message is the whole three-section payload.
        let sink = send(&controller, FULL_PAYLOAD);
        assert!(last_reply(&sink).contains(i18n::RESULT_HEADER));
    }

    #[test]
    fn fallback_reports_missing_sections_and_stays() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        send(&controller, "Alice, Bob");
        send(&controller, "no");
        send(&controller, "Alice, Bob");
        send(&controller, "no");
        send(&controller, "Alice, Bob");
        send(&controller, "no");

        let sink = send(&controller, "[Members]\nAlice, Bob");
        assert!(!last_reply(&sink).contains(i18n::RESULT_HEADER));
        controller
            .sessions()
            .with_session("u1", |s| assert_eq!(s.step, SessionStep::ManualFallback));
    }

    #[test]
    fn retry_exhaustion_switches_to_manual_fallback() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        send(&controller, "Alice, Bob");
        send(&controller, "yes");

        for attempt in 1..=4u32 {
            let sink = send(&controller, "this is not a payment line");
            if attempt <= 3 {
                assert!(last_reply(&sink).contains(i18n::PROMPT_PAYMENTS));
            } else {
                assert_eq!(last_reply(&sink), i18n::RETRY_EXHAUSTED_INSTRUCTIONS);
            }
        }

        controller
            .sessions()
            .with_session("u1", |s| assert_eq!(s.step, SessionStep::ManualFallback));
    }

    #[rstest]
    #[case::latin("maybe")]
    #[case::cjk("不知道")]
    fn unrecognized_confirmation_reprompts(#[case] answer: &str) {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        send(&controller, "Alice, Bob");
        let sink = send(&controller, answer);
        assert_eq!(last_reply(&sink), i18n::REPROMPT_CONFIRM);

        // Still confirmable afterwards.
        let sink = send(&controller, "yes");
        assert_eq!(last_reply(&sink), i18n::PROMPT_PAYMENTS);
    }

    #[rstest]
    #[case::english("reset")]
    #[case::chinese("重置")]
    fn reset_restarts_from_any_state(#[case] command: &str) {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        run_happy_path_to_exclusions(&controller);
        let sink = send(&controller, command);
        assert_eq!(last_reply(&sink), i18n::WELCOME);

        controller.sessions().with_session("u1", |s| {
            assert_eq!(s.step, SessionStep::Collecting(Stage::Members));
        });
    }

    #[test]
    fn done_state_accepts_fresh_roster() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        send(&controller, FULL_PAYLOAD);
        send(&controller, "yes");

        let sink = send(&controller, "Dave, Erin");
        assert!(last_reply(&sink).contains(i18n::PARSED_HEADER));
        controller.sessions().with_session("u1", |s| {
            assert_eq!(s.step, SessionStep::AwaitingConfirmation(Stage::Members));
            assert!(s.ledger.is_none());
        });
    }

    #[test]
    fn assistant_normalizes_free_text_into_full_payload() {
        let renderer = StubRenderer;
        let interpreter = CannedInterpreter(FULL_PAYLOAD);
        let controller = ConversationController::new(
            Some(&interpreter),
            &renderer,
            WorkflowPolicy::assistant_assisted(),
        );

        send(&controller, "Alice, Bob, Charlie");
        send(&controller, "yes");

        // Free text fails the payment grammar; the assistant rewrites it
        // into the canonical payload, confirmed as a whole.
        let sink = send(&controller, "we all went out and Alice covered dinner at 300");
        assert!(last_reply(&sink).contains(i18n::CONFIRM_SUFFIX));

        let sink = send(&controller, "yes");
        assert!(last_reply(&sink).contains(i18n::RESULT_HEADER));
    }

    #[test]
    fn broken_interpreter_falls_back_to_retries() {
        let renderer = StubRenderer;
        let interpreter = BrokenInterpreter;
        let controller = ConversationController::new(
            Some(&interpreter),
            &renderer,
            WorkflowPolicy::assistant_assisted(),
        );

        send(&controller, "Alice, Bob");
        send(&controller, "yes");
        for _ in 0..4 {
            send(&controller, "garbage that parses nowhere");
        }

        controller
            .sessions()
            .with_session("u1", |s| assert_eq!(s.step, SessionStep::ManualFallback));
    }

    #[test]
    fn chart_failure_still_delivers_the_report() {
        let renderer = FailingRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        send(&controller, FULL_PAYLOAD);
        let sink = send(&controller, "yes");

        assert!(last_reply(&sink).contains(i18n::RESULT_HEADER));
        assert_eq!(sink.pushes, vec![i18n::CHART_FAILED.to_string()]);
        controller
            .sessions()
            .with_session("u1", |s| assert_eq!(s.step, SessionStep::Done));
    }

    #[test]
    fn unknown_payer_is_rejected_at_the_payments_stage() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        send(&controller, "Alice, Bob");
        send(&controller, "yes");
        let sink = send(&controller, "Dave paid 100 for lunch");

        // The unknown payer is a validation error, not something to confirm.
        assert!(last_reply(&sink).contains("Dave"));
        assert!(!last_reply(&sink).contains(i18n::CONFIRM_SUFFIX));
        controller.sessions().with_session("u1", |s| {
            assert_eq!(s.step, SessionStep::Collecting(Stage::Payments));
            assert_eq!(s.retry_count, 1);
        });

        let sink = send(&controller, "Alice paid 100 for lunch");
        assert!(last_reply(&sink).contains(i18n::CONFIRM_SUFFIX));
    }

    #[test]
    fn unknown_exclusion_item_is_rejected_at_the_exclusions_stage() {
        let renderer = StubRenderer;
        let controller = ConversationController::new(None, &renderer, WorkflowPolicy::default());

        send(&controller, "Alice, Bob");
        send(&controller, "yes");
        send(&controller, "Alice paid 100 for lunch");
        send(&controller, "yes");
        let sink = send(&controller, "dinner excludes Bob");

        assert!(last_reply(&sink).contains("dinner"));
        assert!(!last_reply(&sink).contains(i18n::CONFIRM_SUFFIX));
        controller.sessions().with_session("u1", |s| {
            assert_eq!(s.step, SessionStep::Collecting(Stage::Exclusions));
        });

        let sink = send(&controller, "lunch excludes Bob");
        assert!(last_reply(&sink).contains(i18n::CONFIRM_SUFFIX));
    }
}
