//! Numbered console menu
//!
//! The menu loops until option 3 or end of input. Option 1 runs the comparator
//! over every configured model; option 2 picks one model by its 1-based
//! position and opens a chat session with it.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::num::{IntErrorKind, ParseIntError};

use tracing::debug;

use crate::core::compare::Comparator;
use crate::core::config::Config;
use crate::core::service::CompletionService;
use crate::core::session::ChatSession;
use crate::utils::input::prompt_line;

const BANNER_WIDTH: usize = 50;
const BANNER_TITLE: &str = "AI FOUNDRY LLM MODELS DEMO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Compare,
    Chat,
    Exit,
}

impl MenuChoice {
    /// Match the line exactly; surrounding whitespace makes it invalid.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(MenuChoice::Compare),
            "2" => Some(MenuChoice::Chat),
            "3" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    NotANumber,
    OutOfRange,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NotANumber => f.write_str("Please enter a valid number"),
            SelectionError::OutOfRange => f.write_str("Invalid model selection"),
        }
    }
}

/// Parse a 1-based model position. Integers of any size are positions; only
/// text that is not an integer at all is `NotANumber`.
pub fn parse_model_selection(input: &str) -> Result<usize, SelectionError> {
    let position: i64 = input.trim().parse().map_err(|err: ParseIntError| {
        match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => SelectionError::OutOfRange,
            _ => SelectionError::NotANumber,
        }
    })?;

    usize::try_from(position).map_err(|_| SelectionError::OutOfRange)
}

/// Resolve the user's selection to one of the configured models.
pub fn select_model<'c>(config: &'c Config, input: &str) -> Result<&'c str, SelectionError> {
    let position = parse_model_selection(input)?;
    config.model_at(position).ok_or(SelectionError::OutOfRange)
}

fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "{BANNER_TITLE}")?;
    writeln!(out, "{rule}")
}

fn write_options<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nOptions:")?;
    writeln!(out, "1. Compare models on a sample prompt")?;
    writeln!(out, "2. Interactive chat with a specific model")?;
    writeln!(out, "3. Exit")
}

/// Run the menu until the user picks "3" or input runs out.
pub async fn run_menu<R: BufRead, W: Write>(
    service: &dyn CompletionService,
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    write_banner(out)?;

    loop {
        write_options(out)?;
        let Some(line) = prompt_line(input, out, "\nEnter your choice (1-3): ")? else {
            debug!("Input closed at menu");
            return Ok(());
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Compare) => {
                let Some(prompt) =
                    prompt_line(input, out, "\nEnter a prompt to test across all models: ")?
                else {
                    return Ok(());
                };
                Comparator::new(service, config)
                    .compare(&config.models, &prompt, out)
                    .await?;
            }
            Some(MenuChoice::Chat) => {
                writeln!(out, "\nAvailable models:")?;
                for (position, model) in config.models.iter().enumerate() {
                    writeln!(out, "{}. {}", position + 1, model)?;
                }

                let selection_prompt = format!("\nSelect model (1-{}): ", config.model_count());
                let Some(selection) = prompt_line(input, out, &selection_prompt)? else {
                    return Ok(());
                };

                match select_model(config, &selection) {
                    Ok(model) => {
                        debug!(model = %model, "Starting chat session");
                        ChatSession::new(service, model, config.generation)
                            .run(input, out)
                            .await?;
                    }
                    Err(err) => writeln!(out, "{err}")?,
                }
            }
            Some(MenuChoice::Exit) => {
                writeln!(out, "Exiting demo...")?;
                out.flush()?;
                return Ok(());
            }
            None => writeln!(out, "Invalid choice. Please select 1-3.")?,
        }
    }
}
