use anyhow::Context;
use std::env;
use std::fs::File;

use skyburst::config::{self, Command, Config};

fn init_logging(config: &Config) -> anyhow::Result<()> {
    // The screen belongs to the show, so logs only ever go to a file
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = match config::parse_args(env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            eprintln!("{}", config::usage());
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("{}", config::usage());
            std::process::exit(1);
        }
    };

    init_logging(&config)?;
    log::info!("skyburst starting: {config:?}");

    skyburst::app::run(&config).context("fireworks show failed")?;
    log::info!("skyburst exiting");
    Ok(())
}
