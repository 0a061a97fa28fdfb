use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use warikan_domain::ExpenseLedger;
use warikan_i18n as i18n;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Members,
    Payments,
    Exclusions,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Members => Some(Stage::Payments),
            Stage::Payments => Some(Stage::Exclusions),
            Stage::Exclusions => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Stage::Members => i18n::PROMPT_MEMBERS,
            Stage::Payments => i18n::PROMPT_PAYMENTS,
            Stage::Exclusions => i18n::PROMPT_EXCLUSIONS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStep {
    Collecting(Stage),
    AwaitingConfirmation(Stage),
    ManualFallback,
    Done,
}

/// Raw text waiting for a yes/no. Confirmation re-parses it, so the
/// session never has to own parser borrows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingInput {
    Stage { stage: Stage, raw: String },
    Full { raw: String },
}

#[derive(Clone, Debug)]
pub struct SessionContext {
    pub step: SessionStep,
    pub pending: Option<PendingInput>,
    pub retry_count: u32,
    pub reject_count: u32,
    pub members_raw: Option<String>,
    pub payments_raw: Option<String>,
    /// Kept after `Done` so the round can be inspected until reset.
    pub ledger: Option<ExpenseLedger>,
    pub last_active: Instant,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            step: SessionStep::Collecting(Stage::Members),
            pending: None,
            retry_count: 0,
            reject_count: 0,
            members_raw: None,
            payments_raw: None,
            ledger: None,
            last_active: Instant::now(),
        }
    }
}

impl SessionContext {
    /// Back to a fresh round; `last_active` keeps ticking.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-user conversation state. The `DashMap` entry lock serializes
/// turns from the same user while keeping users independent.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, SessionContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session<F, R>(&self, user_id: &str, f: F) -> R
    where
        F: FnOnce(&mut SessionContext) -> R,
    {
        let mut entry = self.inner.entry(user_id.to_string()).or_default();
        let context = entry.value_mut();
        context.last_active = Instant::now();
        f(context)
    }

    pub fn reset(&self, user_id: &str) {
        if let Some(mut entry) = self.inner.get_mut(user_id) {
            entry.reset();
        }
    }

    /// Drops sessions idle longer than `ttl`.
    pub fn evict_idle(&self, ttl: Duration) {
        self.inner
            .retain(|_, session| session.last_active.elapsed() < ttl);
    }

    #[cfg(test)]
    pub fn contains(&self, user_id: &str) -> bool {
        self.inner.contains_key(user_id)
    }
}
