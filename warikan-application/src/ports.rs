use warikan_domain::SettlementSummary;

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error("input could not be normalized: {0}")]
    Unintelligible(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ChartRenderError {
    #[error("chart rasterization failed: {0}")]
    Render(String),
    #[error("chart artifact could not be written")]
    Io(#[from] std::io::Error),
}

/// A stored chart artifact, addressed by the URL a user can open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartReference {
    pub url: String,
}

/// Best-effort rewriting of free-form text into the canonical
/// three-section payload. Implementations may consult an external
/// assistant; failure is expected and non-fatal.
pub trait TextInterpreter: Send + Sync {
    fn interpret(&self, text: &str) -> Result<String, InterpretError>;
}

pub trait ChartRenderer: Send + Sync {
    fn render(&self, summary: &SettlementSummary) -> Result<ChartReference, ChartRenderError>;
}

/// Outbound messaging. `reply` answers the message being handled;
/// `push` delivers follow-ups such as the chart link.
pub trait MessageSink {
    fn reply(&mut self, text: String);
    fn push(&mut self, text: String);
}
