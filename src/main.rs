use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use logicsim::shell::Simulator;

#[derive(Parser, Debug)]
#[clap(author, version, about = "An interactive digital logic gate simulator", long_about = None)]
struct Args {
    #[clap(short, long, value_parser, value_name = "FILE")]
    /// Read commands from FILE instead of the terminal
    script: Option<PathBuf>,

    #[clap(short, long)]
    /// Do not print the welcome banner or the prompt
    quiet: bool,

    #[clap(short, long, action = clap::ArgAction::Count)]
    /// Increase the log level (-v: info, -vv: debug, -vvv: trace)
    verbose: u8,

    #[clap(long, value_parser, env = "LOGICSIM_LOG", value_name = "LEVEL")]
    /// Log level (off, error, warn, info, debug, trace); overrides --verbose
    log_level: Option<LevelFilter>,
}

fn init_logger(args: &Args) {
    let level = args.log_level.unwrap_or(match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse_from(argfile::expand_args_from(
        wild::args_os(),
        argfile::parse_fromfile,
        argfile::PREFIX,
    )?);

    init_logger(&args);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut simulator = Simulator::new();

    if let Some(path) = &args.script {
        info!("running script {}", path.display());

        let file = File::open(path)
            .with_context(|| format!("could not open script {}", path.display()))?;

        simulator.run(BufReader::new(file), &mut out, false)?;
    } else {
        if !args.quiet {
            Simulator::welcome(&mut out)?;
        }

        simulator.run(io::stdin().lock(), &mut out, !args.quiet)?;
    }

    simulator.clean_up(&mut out)?;
    out.flush()?;

    Ok(())
}
