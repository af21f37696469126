// annoy: AnnoyScript interpreter with a time-travel tape viewer

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as ClapParser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use annoyscript::config::{MachineConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_NESTING_DEPTH};
use annoyscript::interpreter::errors::RuntimeError;
use annoyscript::interpreter::io::ScriptedInput;
use annoyscript::ui::App;
use annoyscript::{Error, Interpreter, Program};

/// Run an AnnoyScript program
#[derive(ClapParser, Debug)]
#[command(name = "annoy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source file to run
    file: PathBuf,

    /// Feed `,` from this text instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Open the time-travel viewer after the run
    #[arg(long)]
    tui: bool,

    /// Print instruction count, final pointer and the hottest blocks to stderr
    #[arg(long)]
    stats: bool,

    /// Deepest block nesting accepted
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    max_depth: usize,

    /// Snapshot memory limit in bytes (history is only recorded with --tui or this flag)
    #[arg(long)]
    history_limit: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "annoyscript=warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut config = MachineConfig::default().with_max_nesting_depth(cli.max_depth);
    if let Some(limit) = cli.history_limit {
        config = config.with_history(limit);
    } else if cli.tui {
        config = config.with_history(DEFAULT_HISTORY_LIMIT);
    }

    let program = match annoyscript::load(&source, &config) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        file = %cli.file.display(),
        blocks = program.blocks.len(),
        nodes = program.node_count(),
        "parsed program"
    );

    let mut interpreter = Interpreter::new(program, config);
    if let Some(text) = &cli.input {
        interpreter = interpreter.with_input(ScriptedInput::new(text));
    }
    if cli.tui {
        // Output is replayed from the transcript inside the viewer
        interpreter = interpreter.with_output(io::sink());
    }

    let result = interpreter.run();
    debug!(
        instructions = interpreter.instruction_counter(),
        snapshots = interpreter.total_snapshots(),
        "run complete"
    );

    if cli.stats {
        print_stats(&interpreter);
    }

    if cli.tui {
        let run_error = result.err();
        let viewer = run_viewer(interpreter, source, run_error.clone());
        return if report_viewer_session(run_error, viewer) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", Error::from(e));
            ExitCode::FAILURE
        }
    }
}

fn print_stats(interpreter: &Interpreter) {
    let program: &Program = interpreter.program();
    eprintln!("instructions: {}", interpreter.instruction_counter());
    eprintln!("pointer:      {}", interpreter.pointer());
    eprintln!("hottest blocks:");
    for (id, hits) in interpreter.hottest_blocks(5) {
        match program.find_block(id) {
            Some(block) => eprintln!(
                "  #{:<5} {:>8}x  {}{} at {}",
                id,
                hits,
                block.kind.opener(),
                block.kind.closer(),
                block.location
            ),
            None => eprintln!("  #{:<5} {:>8}x", id, hits),
        }
    }
}

/// Print how a viewer session ended and whether the process failed
///
/// A failed run fails the process even after the viewer closed cleanly.
fn report_viewer_session(run_error: Option<RuntimeError>, viewer: anyhow::Result<()>) -> bool {
    let mut failed = false;
    if let Err(e) = viewer {
        eprintln!("Error: {:#}", e);
        failed = true;
    }
    if let Some(e) = run_error {
        eprintln!("\n{}", Error::from(e));
        failed = true;
    }
    failed
}

/// Open the time-travel viewer over a finished (or failed) run
fn run_viewer(
    mut interpreter: Interpreter,
    source: String,
    run_error: Option<RuntimeError>,
) -> anyhow::Result<()> {
    if let Some(e) = &run_error {
        warn!(error = %e, "run failed; opening viewer with partial history");
    }

    // Rewind to the beginning for TUI
    if let Err(e) = interpreter.rewind_to_start() {
        warn!(error = %e, "failed to rewind to start");
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut app = App::new(interpreter, source, run_error);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    res.context("viewer event loop failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use annoyscript::parser::ast::SourceLocation;

    #[test]
    fn test_viewer_session_fails_on_runtime_error() {
        assert!(!report_viewer_session(None, Ok(())));

        let dismay = RuntimeError::DisplayOfDismay {
            cell: 0,
            value: 0,
            location: SourceLocation::new(3, 1, 4),
        };
        assert!(report_viewer_session(Some(dismay), Ok(())));
        assert!(report_viewer_session(
            None,
            Err(anyhow::anyhow!("terminal went away"))
        ));
    }
}
