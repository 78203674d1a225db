use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, LevelFilter};

use idx2csv::dataset::{run_parallel, run_sequential, standard_conversions};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the four binary dataset files
    #[arg(long, default_value = "bin")]
    input_dir: PathBuf,

    /// Directory the CSV files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Run the four conversions on separate threads
    #[arg(long)]
    parallel: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose, args.quiet);

    let conversions = standard_conversions(&args.input_dir, &args.output_dir);
    let outcome = if args.parallel {
        run_parallel(&conversions)
    } else {
        run_sequential(&conversions)
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
