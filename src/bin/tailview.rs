use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tailview::config::TailConfig;
use tailview::tui::{run_tail_tui, TailTuiError};
use tailview::ui::{KeyValue, MessageBlock, OutputMode, PlainRenderer, Renderer};
use tailview::{parse_command, print_usage, Command, TailArgs};
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "TAILVIEW_LOG";
const LOG_FILE_ENV: &str = "TAILVIEW_LOG_FILE";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output_mode = OutputMode::from_env();
    let cmd = match parse_command(args) {
        Ok(cmd) => cmd,
        Err(err) => {
            let mut renderer = PlainRenderer::stderr(output_mode);
            let _ = renderer.error_block(
                &MessageBlock::new("Invalid command arguments", err.to_string())
                    .with_hint("Run `tailview --help` to see supported flags"),
            );
            print_usage();
            std::process::exit(2);
        }
    };

    match cmd {
        Command::Help => print_usage(),
        Command::Tail(args) => {
            init_tracing();
            if let Err((title, body, hint)) = tail(&args, output_mode) {
                let mut renderer = PlainRenderer::stderr(output_mode);
                let mut block = MessageBlock::new(title, body);
                if let Some(hint) = hint {
                    block = block.with_hint(hint);
                }
                let _ = renderer.error_block(&block);
                std::process::exit(1);
            }
        }
    }
}

type Failure = (&'static str, String, Option<&'static str>);

fn tail(args: &TailArgs, output_mode: OutputMode) -> Result<(), Failure> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = TailConfig::load(args.config.as_deref(), &cwd)
        .map_err(|err| ("Config invalid", err.to_string(), None))?;
    args.apply_to(&mut config);

    let outcome = run_tail_tui(&config, &cwd).map_err(|err| {
        let hint = matches!(err, TailTuiError::NoContainers).then_some(
            "Declare [[containers]] entries with `name` and `run` in tailview.toml",
        );
        ("Log view failed", err.to_string(), hint)
    })?;

    let mut renderer = PlainRenderer::stdout(output_mode);
    let _ = renderer.section("Session");
    let _ = renderer.key_values(&[
        KeyValue::new("selection", config.selection.clone()),
        KeyValue::new(
            "source",
            outcome.last_source.unwrap_or_else(|| "-".to_owned()),
        ),
        KeyValue::new("buffered lines", outcome.buffered_lines.to_string()),
    ]);
    Ok(())
}

/// The terminal belongs to the TUI, so events go to a file or nowhere.
fn init_tracing() {
    let filter = std::env::var(LOG_FILTER_ENV)
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    let file = std::env::var_os(LOG_FILE_ENV)
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());
    let _ = match file {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => builder.with_writer(std::io::sink).try_init(),
    };
}
