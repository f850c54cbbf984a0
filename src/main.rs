use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::{error, info};

mod controller;
mod inputter;
mod logging;
mod model;
mod ui;

use controller::Controller;
use model::{Model, Status};
use sv::domain::{ViewConfig, ViewError};
use sv::loader;

#[derive(Parser, Debug)]
#[command(name = "sv", version, about = "Browse, filter and sort screening records")]
struct Args {
    /// Screenings file (json, csv, parquet or arrow).
    #[arg(default_value = "tests/fixtures/screenings.json")]
    path: String,

    /// Where log output is written.
    #[arg(long, default_value = "sv.log")]
    log_file: PathBuf,

    /// Log filter, overridden by RUST_LOG.
    #[arg(long, default_value = "info,sv=debug")]
    log_filter: String,

    /// Event poll timeout in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: Args) -> Result<(), ViewError> {
    let cfg = ViewConfig::default()
        .with_event_poll_time(args.poll_ms)
        .with_log_file(args.log_file)
        .with_log_filter(args.log_filter);
    logging::init_logging(&cfg)?;

    let path = shellexpand::full(&args.path)
        .map_err(|e| ViewError::LoadingFailed(e.to_string()))?;
    let records = loader::load_records(PathBuf::from(path.into_owned()))?;

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &cfg, records);
    ratatui::restore();

    if let Err(e) = &result {
        error!("Stopped with error: {e}");
    }
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    cfg: &ViewConfig,
    records: Vec<sv::Record>,
) -> Result<(), ViewError> {
    let size = terminal.size()?;
    let mut model = Model::init(cfg, size.width as usize, size.height as usize);
    model.set_data(records)?;
    let controller = Controller::new(cfg);
    info!("Starting sv!");

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui::draw(&model, f))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(&model)? {
            model.update(message)?;
        };
    }

    Ok(())
}
