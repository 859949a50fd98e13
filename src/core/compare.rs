//! Side-by-side comparison of one prompt across every configured model.

use std::io::{self, Write};
use std::time::Instant;

use tracing::{debug, warn};

use crate::core::config::{Config, GenerationParameters};
use crate::core::message::Message;
use crate::core::service::{format_counter, Completion, CompletionRequest, CompletionService};

pub const HEAVY_RULE_WIDTH: usize = 80;
pub const LIGHT_RULE_WIDTH: usize = 40;

pub struct Comparator<'a> {
    service: &'a dyn CompletionService,
    system_prompt: &'a str,
    parameters: GenerationParameters,
}

impl<'a> Comparator<'a> {
    pub fn new(service: &'a dyn CompletionService, config: &'a Config) -> Self {
        Self {
            service,
            system_prompt: &config.system_prompt,
            parameters: config.generation,
        }
    }

    fn request_for(&self, model: &str, prompt: &str) -> CompletionRequest {
        CompletionRequest::new(
            model,
            vec![Message::system(self.system_prompt), Message::user(prompt)],
            self.parameters,
        )
    }

    /// Ask every model in `models`, in order, and print one block per model.
    ///
    /// A failing model is reported inside its own block and never stops the
    /// remaining models from being asked. Only console write failures are
    /// returned.
    pub async fn compare<W: Write>(
        &self,
        models: &[String],
        prompt: &str,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "Prompt: {prompt}\n")?;
        writeln!(out, "{}", "=".repeat(HEAVY_RULE_WIDTH))?;

        for model in models {
            writeln!(out, "\nModel: {model}")?;
            writeln!(out, "{}", "-".repeat(LIGHT_RULE_WIDTH))?;
            out.flush()?;

            let request = self.request_for(model, prompt);
            let started = Instant::now();
            let outcome = self.service.complete(&request).await;
            let elapsed = started.elapsed();

            match outcome {
                Ok(completion) => {
                    debug!(model = %model, elapsed_ms = elapsed.as_millis() as u64, "Model answered");
                    write_completion(out, &completion)?;
                    writeln!(out, "Time elapsed: {:.2} seconds", elapsed.as_secs_f64())?;
                }
                Err(err) => {
                    warn!(
                        model = %model,
                        kind = ?err.kind(),
                        recoverable = err.is_recoverable(),
                        "Model comparison call failed"
                    );
                    writeln!(out, "Error with model {model}: {err}")?;
                }
            }

            writeln!(out, "{}", "=".repeat(HEAVY_RULE_WIDTH))?;
            out.flush()?;
        }

        Ok(())
    }
}

fn write_completion<W: Write>(out: &mut W, completion: &Completion) -> io::Result<()> {
    let Some(choice) = completion.first_choice() else {
        return writeln!(out, "No content in response");
    };

    writeln!(
        out,
        "Response:\n{}\n",
        choice.content.as_deref().unwrap_or_default()
    )?;
    writeln!(
        out,
        "Completion tokens: {}",
        format_counter(completion.usage.completion_tokens)
    )?;
    writeln!(
        out,
        "Prompt tokens: {}",
        format_counter(completion.usage.prompt_tokens)
    )?;
    writeln!(
        out,
        "Total tokens: {}",
        format_counter(completion.usage.total_tokens)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;
    use crate::core::service::testing::ScriptedService;
    use crate::core::service::{CompletionChoice, ErrorKind, ServiceError, TokenUsage};

    fn models(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    async fn run(service: &ScriptedService, ids: &[&str], prompt: &str) -> String {
        let config = Config::default();
        let mut out = Vec::new();
        Comparator::new(service, &config)
            .compare(&models(ids), prompt, &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn prints_one_block_per_model_in_order() {
        let service = ScriptedService::new();
        service.push_text("alpha").push_text("beta").push_text("gamma");

        let output = run(&service, &["A", "B", "C"], "Why?").await;

        assert!(output.starts_with("Prompt: Why?\n\n"));
        let a = output.find("Model: A").unwrap();
        let b = output.find("Model: B").unwrap();
        let c = output.find("Model: C").unwrap();
        assert!(a < b && b < c);
        assert_eq!(output.matches("\nModel: ").count(), 3);
        // header rule plus one closing rule per model
        assert_eq!(output.matches(&"=".repeat(80)).count(), 4);
        assert_eq!(output.matches("Time elapsed: ").count(), 3);
    }

    #[tokio::test]
    async fn failure_does_not_stop_later_models() {
        let service = ScriptedService::new();
        service
            .push_completion(Err(ServiceError::from_status(401, "bad key")))
            .push_text("B says hi");

        let output = run(&service, &["A", "B"], "hello").await;

        assert!(output.contains("Error with model A: authentication failed: bad key"));
        assert!(output.contains("Response:\nB says hi\n"));
        assert!(output.find("Error with model A").unwrap() < output.find("Model: B").unwrap());
        assert_eq!(service.requests().len(), 2);
    }

    #[tokio::test]
    async fn each_request_has_system_and_user_message_and_no_stream_flag() {
        let service = ScriptedService::new();
        service.push_text("one").push_text("two");

        run(&service, &["m1", "m2"], "the prompt").await;

        let requests = service.requests();
        assert_eq!(requests[0].model, "m1");
        assert_eq!(requests[1].model, "m2");
        for request in &requests {
            assert!(!request.stream);
            assert_eq!(request.messages.len(), 2);
            assert_eq!(request.messages[0].role, Role::System);
            assert_eq!(request.messages[0].content, "You are a helpful assistant.");
            assert_eq!(request.messages[1].role, Role::User);
            assert_eq!(request.messages[1].content, "the prompt");
            assert_eq!(request.parameters, GenerationParameters::default());
        }
    }

    #[tokio::test]
    async fn missing_usage_counters_render_as_placeholder() {
        let service = ScriptedService::new();
        service.push_completion(Ok(Completion {
            choices: vec![CompletionChoice {
                content: Some("text".to_string()),
            }],
            usage: TokenUsage {
                completion_tokens: None,
                prompt_tokens: Some(11),
                total_tokens: None,
            },
        }));

        let output = run(&service, &["A"], "p").await;

        assert!(output.contains("Completion tokens: N/A\n"));
        assert!(output.contains("Prompt tokens: 11\n"));
        assert!(output.contains("Total tokens: N/A\n"));
    }

    #[tokio::test]
    async fn empty_choice_list_prints_no_content_notice() {
        let service = ScriptedService::new();
        service.push_completion(Ok(Completion::default()));

        let output = run(&service, &["A"], "p").await;

        assert!(output.contains("No content in response\n"));
        assert!(!output.contains("Response:"));
        assert!(output.contains("Time elapsed: "));
    }

    #[tokio::test]
    async fn every_model_failing_still_prints_every_block() {
        let service = ScriptedService::new();
        for _ in 0..3 {
            service.push_completion(Err(ServiceError::new(ErrorKind::Network, "offline")));
        }

        let output = run(&service, &["A", "B", "C"], "p").await;

        assert_eq!(output.matches("network error: offline").count(), 3);
        assert_eq!(output.matches(&"-".repeat(40)).count(), 3);
        assert!(!output.contains("Time elapsed"));
    }
}
