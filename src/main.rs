use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result};
use log::{info, LevelFilter};
use ls8::memory::StdMem;
use ls8::processor::Processor;
use simple_logger::SimpleLogger;

/// LS-8 emulator
#[derive(Parser)]
#[command(name = "ls8", version)]
#[command(about = "Runs an LS-8 program image", long_about = None)]
struct Args {
    /// Program image with one binary byte per line (e.g. programs/print8.ls8)
    program: PathBuf,

    /// Log a hex dump of the loaded memory before running
    #[arg(long)]
    dump: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// The dump is logged at info, so `--dump` raises the level to at least that
    fn log_level(&self) -> LevelFilter {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        if self.dump {
            level.max(LevelFilter::Info)
        } else {
            level
        }
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|err| err.kind() == ErrorKind::NotFound)
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?; // rust error handling

    // usage errors go to stdout, help and version exit as usual
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            print!("{}", err.render());
            return Ok(ExitCode::from(2));
        }
        Err(err) => err.exit(),
    };
    SimpleLogger::new().with_level(args.log_level()).init()?; // logging

    let mut mem = match StdMem::from_file(&args.program) {
        Ok(mem) => mem,
        Err(err) if is_not_found(&err) => {
            println!("file not found: {}", args.program.display());
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err),
    };
    info!("Loaded {}", args.program.display());

    if args.dump {
        mem.dump();
    }

    let mut cpu = Processor::new();
    cpu.execute_until_halt(&mut mem, &mut io::stdout().lock())?;

    Ok(ExitCode::SUCCESS)
}
