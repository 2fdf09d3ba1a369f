use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing_log::AsTrace;
use tracing_subscriber::prelude::*;
use xunit_to_extent::convert::{run_convert, ConvertArgs};

#[derive(Debug, Parser)]
#[command(
    version = std::env!("CARGO_PKG_VERSION"),
    name = "xunit-to-extent",
    about = "Convert xUnit test results into an Extent report",
    bin_name = "xunit-to-extent",
)]
struct Cli {
    #[command(flatten)]
    convert_args: ConvertArgs,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() {
    let Cli {
        convert_args,
        verbose,
    } = Cli::parse();

    // stdout may carry the report, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(verbose.log_level_filter().as_trace())
        .init();

    match run_convert(convert_args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            tracing::error!("Error: {:?}", e);
            std::process::exit(exitcode::SOFTWARE);
        }
    }
}
