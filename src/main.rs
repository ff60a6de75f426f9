mod grid;
mod loader;
mod model;
mod render;
mod resolve;
mod theme;
use crate::render::RenderConfig;
use anyhow::Context;
use lexopt::{Arg, Parser};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run { calendar: PathBuf },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut calendar = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Value(value) if calendar.is_none() => calendar = Some(PathBuf::from(value)),
                _ => return Err(arg.unexpected()),
            }
        }
        calendar
            .map(|calendar| Command::Run { calendar })
            .ok_or_else(|| lexopt::Error::MissingValue { option: None })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { calendar } => {
                let calendar = loader::load(&calendar)?;
                let stdout = io::stdout();
                let config = RenderConfig::default().with_options(calendar.options);
                render::render(&calendar, config, &mut stdout.lock())
                    .context("failed to render calendar")?;
                Ok(())
            }
            Command::Help => {
                println!("Usage: lifecal <calendar-file>");
                println!();
                println!("Render a life calendar of weeks with color-coded life events");
                println!();
                println!("The calendar file is JSON, or TOML if its name ends in .toml.");
                println!();
                println!("Options:");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    Command::from_parser(Parser::from_env())?.run()
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default: warnings only)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
