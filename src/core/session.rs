//! Interactive streaming chat with a single model.

use std::io::{self, BufRead, Write};

use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::core::config::GenerationParameters;
use crate::core::message::History;
use crate::core::service::{CompletionRequest, CompletionService, ServiceError};
use crate::utils::input::prompt_line;

pub const EXIT_COMMAND: &str = "exit";

/// Where a session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Streaming,
    /// The stream finished and its text is being added to the history.
    Recording,
    Terminal,
}

pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_COMMAND)
}

pub struct ChatSession<'a> {
    service: &'a dyn CompletionService,
    model: String,
    parameters: GenerationParameters,
    history: History,
    state: SessionState,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        service: &'a dyn CompletionService,
        model: impl Into<String>,
        parameters: GenerationParameters,
    ) -> Self {
        Self {
            service,
            model: model.into(),
            parameters,
            history: History::new(),
            state: SessionState::AwaitingInput,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Read turns until `exit` (any case) or end of input, then hand back the
    /// conversation. Service failures end only the current turn.
    pub async fn run<R: BufRead, W: Write>(
        mut self,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<History> {
        writeln!(out, "\nStarting interactive chat with {}", self.model)?;
        writeln!(out, "Type 'exit' to end the conversation\n")?;

        while self.state != SessionState::Terminal {
            let Some(line) = prompt_line(input, out, "\nYou: ")? else {
                debug!(model = %self.model, "Input closed, ending chat session");
                self.state = SessionState::Terminal;
                break;
            };

            if is_exit_command(&line) {
                self.state = SessionState::Terminal;
                break;
            }

            self.take_turn(line, out).await?;
        }

        debug!(
            model = %self.model,
            messages = self.history.len(),
            "Chat session finished"
        );
        Ok(self.history)
    }

    /// One user turn: record the input, stream the reply to `out`, and record
    /// the streamed text as the assistant message.
    pub async fn take_turn<W: Write>(&mut self, user_input: String, out: &mut W) -> io::Result<()> {
        self.history.push_user(user_input);

        write!(out, "\n{}: ", self.model)?;
        out.flush()?;

        let request = CompletionRequest::new(
            self.model.clone(),
            self.history.messages().to_vec(),
            self.parameters,
        )
        .streaming();

        self.state = SessionState::Streaming;
        match self.stream_reply(&request, out).await? {
            Ok(reply) => {
                self.state = SessionState::Recording;
                self.history.push_assistant(reply);
            }
            Err(err) => {
                warn!(
                    model = %self.model,
                    kind = ?err.kind(),
                    recoverable = err.is_recoverable(),
                    "Chat turn failed"
                );
                writeln!(out, "\nError: {err}")?;
            }
        }
        self.state = SessionState::AwaitingInput;
        Ok(())
    }

    async fn stream_reply<W: Write>(
        &self,
        request: &CompletionRequest,
        out: &mut W,
    ) -> io::Result<Result<String, ServiceError>> {
        let mut fragments = match self.service.complete_streaming(request).await {
            Ok(fragments) => fragments,
            Err(err) => return Ok(Err(err)),
        };

        let mut reply = String::new();
        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(text) => {
                    write!(out, "{text}")?;
                    out.flush()?;
                    reply.push_str(&text);
                }
                Err(err) => return Ok(Err(err)),
            }
        }
        writeln!(out)?;

        Ok(Ok(reply))
    }
}
