use anyhow::{Context, Result};
use archive_desc::{make_archives, ArTool, LIBS};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::fmt::Display;
use std::path::PathBuf;

const USAGE: &str = "Usage: make-archives <objdir>";

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble final static archives from .desc descriptors", long_about = None)]
struct Args {
    /// Build output directory; every LIBS member must live under it
    objdir: PathBuf,

    /// Archiver, run as `<ar> -r <output> <members...>`
    #[arg(long, default_value = "ar")]
    ar: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn die(msg: impl Display) -> ! {
    eprintln!("ERROR: {msg}");
    std::process::exit(1)
}

/// `Ok(None)` means clap already printed help or version.
fn parse_args<I, T>(argv: I) -> std::result::Result<Option<Args>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Ok(Some(args)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print().ok();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> Result<()> {
    log::debug!("archiver: {}", args.ar);
    let mut ar = ArTool::new(args.ar.as_str());
    make_archives(&args.objdir, LIBS, &mut ar)
        .with_context(|| format!("building archives under {}", args.objdir.display()))
}

fn main() {
    let args = match parse_args(std::env::args_os()) {
        Ok(Some(args)) => args,
        Ok(None) => return,
        Err(_) => die(USAGE),
    };
    init_logger(args.verbose);

    if let Err(e) = run(&args) {
        die(format!("{e:#}"));
    }
}
