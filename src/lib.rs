pub mod config;
pub mod logs;
pub mod shell_source;
pub mod testing;
pub mod tui;
pub mod ui;

use std::path::PathBuf;

use thiserror::Error;

use crate::config::TailConfig;
use crate::ui::{KeyValue, OutputMode, PlainRenderer, Renderer, UiResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tail(TailArgs),
    Help,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailArgs {
    pub config: Option<PathBuf>,
    pub buffer: Option<usize>,
    pub selection: Option<String>,
}

impl TailArgs {
    /// Flags win over the file and the environment.
    pub fn apply_to(&self, config: &mut TailConfig) {
        if let Some(buffer) = self.buffer {
            config.log_buffer_size = buffer;
        }
        if let Some(selection) = &self.selection {
            config.selection = selection.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliParseError {
    #[error("--config requires a value")]
    MissingConfigValue,
    #[error("--buffer requires a value")]
    MissingBufferValue,
    #[error("--selection requires a value")]
    MissingSelectionValue,
    #[error("--buffer expects a positive line count, got `{0}`")]
    InvalidBufferValue(String),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

pub fn parse_command<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut tail = TailArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingConfigValue);
                };
                tail.config = Some(PathBuf::from(path));
            }
            "--buffer" => {
                let Some(raw) = args.next() else {
                    return Err(CliParseError::MissingBufferValue);
                };
                match raw.parse::<usize>() {
                    Ok(size) if size > 0 => tail.buffer = Some(size),
                    _ => return Err(CliParseError::InvalidBufferValue(raw)),
                }
            }
            "--selection" => {
                let Some(selection) = args.next() else {
                    return Err(CliParseError::MissingSelectionValue);
                };
                tail.selection = Some(selection);
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliParseError::UnknownArgument(other.to_owned())),
        }
    }

    Ok(Command::Tail(tail))
}

pub fn render_help<R: Renderer>(renderer: &mut R) -> UiResult<()> {
    renderer.section("tailview")?;
    renderer.text("Tail the log streams of a selected resource, one page per container.\n")?;
    renderer.text("USAGE:\n  tailview [--config <PATH>] [--buffer <N>] [--selection <NS/NAME>]\n")?;
    renderer.text("OPTIONS:")?;
    renderer.key_values(&[
        KeyValue::new("  --config <PATH>", "Config file (default: ./tailview.toml)"),
        KeyValue::new("  --buffer <N>", "Lines kept per stream (env: TAILVIEW_LOG_BUFFER)"),
        KeyValue::new("  --selection <NS/NAME>", "Resource path passed to every stream"),
        KeyValue::new("  -h, --help", "Print help"),
    ])?;
    renderer.text("")?;
    renderer.text("KEYS:")?;
    renderer.key_values(&[
        KeyValue::new("  1-9", "Switch container"),
        KeyValue::new("  c / u / d", "Clear, top, bottom"),
        KeyValue::new("  b / f", "Page up, page down"),
        KeyValue::new("  esc, ctrl+c", "Leave"),
    ])?;
    Ok(())
}

pub fn print_usage() {
    let mut renderer = PlainRenderer::stderr(OutputMode::from_env());
    let _ = render_help(&mut renderer);
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
