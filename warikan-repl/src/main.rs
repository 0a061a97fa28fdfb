mod bootstrap;

use std::{
    io::{self, BufRead},
    panic::{self, AssertUnwindSafe},
};

use warikan_application::{
    ConversationController, MessageSink, TextInterpreter, WorkflowPolicy,
};
use warikan_infrastructure::{StrictFormatInterpreter, SvgChartRenderer};

const LOCAL_USER: &str = "local";

struct StdoutSink;

impl MessageSink for StdoutSink {
    fn reply(&mut self, text: String) {
        println!("{text}\n");
    }

    fn push(&mut self, text: String) {
        println!("{text}\n");
    }
}

fn main() {
    bootstrap::init_logging();
    let config = bootstrap::AppConfig::from_env();

    let strict = StrictFormatInterpreter;
    let interpreter = config
        .assisted
        .then_some(&strict as &dyn TextInterpreter);
    let policy = if config.assisted {
        WorkflowPolicy::assistant_assisted()
    } else {
        WorkflowPolicy::default()
    };

    let renderer = SvgChartRenderer::new(config.base_url.clone(), config.chart_dir.clone());
    let controller = ConversationController::new(interpreter, &renderer, policy);
    let mut sink = StdoutSink;

    println!("{}\n", warikan_i18n::WELCOME);

    // Messages are blank-line-terminated blocks, so multi-line payloads
    // arrive as one turn.
    let mut block = String::new();
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                tracing::error!(%error, "stdin read failed");
                break;
            }
        };

        if line.trim().is_empty() {
            if !block.trim().is_empty() {
                handle_block(&controller, &mut sink, &block);
                controller.sessions().evict_idle(config.session_ttl);
            }
            block.clear();
        } else {
            if !block.is_empty() {
                block.push('\n');
            }
            block.push_str(&line);
        }
    }

    if !block.trim().is_empty() {
        handle_block(&controller, &mut sink, &block);
    }
}

/// One turn; an unanticipated fault aborts only this turn and tells the
/// user something went wrong instead of killing the loop.
fn handle_block(controller: &ConversationController<'_>, sink: &mut StdoutSink, block: &str) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        controller.handle_message(LOCAL_USER, block, sink);
    }));
    if outcome.is_err() {
        tracing::error!("turn aborted by panic");
        println!("{}\n", warikan_i18n::INTERNAL_ERROR);
    }
}
