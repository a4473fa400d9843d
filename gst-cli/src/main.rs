//! GST CLI - sets up sphere-source tsunami runs and plots their comparisons.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "gst-cli",
    version,
    about = "Geophysical sphere-source tsunami toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: gst_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("starting gst-cli");
    gst_cmd::run(cli.command)
}
