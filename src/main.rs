use anyhow::Result;
use centinela::cli::{Cli, KeyedBy, OutputFormat};
use centinela::pipeline::{self, PipelineConfig};
use centinela::report::ReportKey;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.sample_size == 0 {
        anyhow::bail!("Invalid value for --sample-size: must be >= 1");
    }

    init_tracing(args.debug);

    let config = PipelineConfig {
        stage1_path: args.stage1,
        stage1_entry: args.stage1_entry,
        stage2_path: args.stage2,
        stage2_entry: args.stage2_entry,
        dataset_path: args.dataset,
        sample_size: args.sample_size,
        seed: args.seed,
        keyed_by: match args.keyed_by {
            KeyedBy::Category => ReportKey::Category,
            KeyedBy::Timestamp => ReportKey::Timestamp,
        },
    };

    let report = pipeline::run(&config)?;

    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
