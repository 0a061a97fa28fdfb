#![warn(clippy::uninlined_format_args)]

pub mod conversation_controller;
pub mod ports;
pub mod session;

pub use conversation_controller::{CollectionPolicy, ConversationController, WorkflowPolicy};
pub use ports::{
    ChartReference, ChartRenderError, ChartRenderer, InterpretError, MessageSink, TextInterpreter,
};
pub use session::{PendingInput, SessionContext, SessionStep, SessionStore, Stage};
