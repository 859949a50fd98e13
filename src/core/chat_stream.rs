use std::collections::VecDeque;
use std::fmt;

use futures_util::{stream, Stream, StreamExt};
use memchr::memchr;
use tracing::warn;

use crate::api::ChatStreamChunk;
use crate::core::service::{ErrorKind, FragmentStream, ServiceError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SseEvent {
    Fragment(String),
    Error(String),
    Done,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn handle_data_payload(payload: &str) -> Option<SseEvent> {
    if payload == "[DONE]" {
        return Some(SseEvent::Done);
    }

    match serde_json::from_str::<ChatStreamChunk>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(SseEvent::Fragment),
        Err(_) => {
            if payload.trim().is_empty() {
                return None;
            }
            Some(SseEvent::Error(format_api_error(payload)))
        }
    }
}

pub fn process_sse_line(line: &str) -> Option<SseEvent> {
    extract_data_payload(line).and_then(handle_data_payload)
}

/// Splits a byte stream into SSE lines, tolerating chunks that end mid-line.
#[derive(Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            match std::str::from_utf8(&self.buffer[..newline_pos]) {
                Ok(line) => events.extend(process_sse_line(line.trim())),
                Err(e) => warn!(error = %e, "Invalid UTF-8 in stream"),
            }
            self.buffer.drain(..=newline_pos);
        }

        events
    }

    /// Flush a final line that arrived without a trailing newline.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        match std::str::from_utf8(&rest) {
            Ok(line) => process_sse_line(line.trim()).into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "Invalid UTF-8 at end of stream");
                Vec::new()
            }
        }
    }
}

struct StreamState<S> {
    source: std::pin::Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, ServiceError>>,
    finished: bool,
}

impl<S> StreamState<S> {
    fn absorb(&mut self, events: Vec<SseEvent>) {
        for event in events {
            match event {
                SseEvent::Fragment(text) => self.pending.push_back(Ok(text)),
                SseEvent::Done => {
                    self.finished = true;
                    return;
                }
                SseEvent::Error(text) => {
                    self.pending
                        .push_back(Err(ServiceError::new(ErrorKind::Unknown, text)));
                    self.finished = true;
                    return;
                }
            }
        }
    }
}

/// Turn a raw SSE byte stream into text fragments.
///
/// The stream ends at `[DONE]`, at the end of the body, or after yielding the
/// first error.
pub fn fragment_stream<S, B, E>(source: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let state = StreamState {
        source: Box::pin(source),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.source.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.push(chunk.as_ref());
                    state.absorb(events);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.pending.push_back(Err(ServiceError::new(
                        ErrorKind::Network,
                        format!("stream interrupted: {e}"),
                    )));
                }
                None => {
                    let events = state.decoder.finish();
                    state.absorb(events);
                    state.finished = true;
                }
            }
        }
    }))
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error:\n```\n<empty>\n```".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            if let Some(summary) = extract_error_summary(&json_value) {
                if !summary.is_empty() {
                    return format!("API Error: {}\n```json\n{}\n```", summary, pretty_json);
                }
            }
            return format!("API Error:\n```json\n{}\n```", pretty_json);
        }
    }

    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        format!("API Error:\n```xml\n{}\n```", trimmed)
    } else {
        format!("API Error:\n```\n{}\n```", trimmed)
    }
}
