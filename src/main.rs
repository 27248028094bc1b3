use clap::Parser;
use roundabout::cli::{run_cli, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_cli(cli, &mut std::io::stdout().lock())
}
