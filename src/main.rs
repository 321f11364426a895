//! `ism` - print or switch the active input source.

use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::Level;

use input_source_manager::host::{self, InputSourceError, SwitchResult};
use input_source_manager::{CategoryMask, ManagerConfig, ffi};

#[derive(Parser, Debug)]
#[command(name = "ism", version, about = "Print or switch the active input source", long_about = None)]
struct Cli {
    /// Input source id to switch to
    id: Option<String>,

    /// List keyboard input source ids
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// List palette input source ids
    #[arg(short = 'p', long = "palette")]
    palette: bool,

    /// Switch to the source after the current one in this list
    #[arg(short = 'c', long = "cycle", num_args = 1.., value_name = "ID", conflicts_with = "id")]
    cycle: Vec<String>,

    /// Milliseconds to wait before verifying a switch
    #[arg(long = "settle-ms", value_name = "MS")]
    settle_ms: Option<u64>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), InputSourceError> {
    if let Some(ms) = cli.settle_ms {
        ffi::configure(ManagerConfig::from_env().with_settle_time(Duration::from_millis(ms)));
    }

    host::initialize();

    if cli.list || cli.palette {
        let mut mask = CategoryMask::empty();
        mask.set(CategoryMask::KEYBOARD, cli.list);
        mask.set(CategoryMask::PALETTE, cli.palette);
        for id in host::available_ids(mask)? {
            println!("{}", id);
        }
        return Ok(());
    }

    if !cli.cycle.is_empty() {
        let (result, id) = host::switch_input_source(&cli.cycle)?;
        if result == SwitchResult::NotSwitched {
            tracing::info!("nothing to switch, staying on {}", id);
        }
        println!("{}", id);
        return Ok(());
    }

    let id = match cli.id {
        Some(id) => host::set_input_source(&id)?,
        None => host::current_id()?,
    };
    println!("{}", id);
    Ok(())
}
