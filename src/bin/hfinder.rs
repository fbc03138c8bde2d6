use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use hfinder::*;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Find hostnames from ASN or CIDR - Robtex x BGP.HE
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// configuration file path, by default $HOME/.hfinder/hfinder.toml is used
    #[clap(long)]
    config: Option<String>,

    /// Print debug information, including skipped lookups
    #[clap(long)]
    debug: bool,

    /// Number of lookups to run at the same time
    #[clap(short, long)]
    jobs: Option<usize>,

    /// Timeout for each page request in seconds
    #[clap(long)]
    timeout: Option<u64>,

    /// Do not print prefixes found while expanding ASNs
    #[clap(short, long)]
    quiet: bool,

    #[clap(flatten)]
    targets: DiscoverArgs,

    #[clap(flatten)]
    render: RenderArgs,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(Level::DEBUG)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = HfinderConfig::new(&cli.config)?.with_overrides(cli.jobs, cli.timeout, cli.quiet)?;
    debug!("configuration:\n{}", config.summary());

    // everything that can be wrong with the arguments is reported before any request
    let target = cli.targets.target()?;
    let render = RenderLens::new(&cli.render)?;

    let fetcher = UreqFetcher::new(config.timeout());
    let mut lens = DiscoverLens::new(&fetcher).with_jobs(config.jobs);
    if config.progress {
        lens = lens.with_progress(Arc::new(|p: &AsnPrefix| eprintln!("{}", p.prefix)));
    }

    let discovery = lens.discover(&target)?;
    let DiscoverySummary {
        targets,
        cidrs_queried,
        hostnames,
    } = discovery.summary;
    info!(
        "{} targets, {} CIDRs queried, {} hostnames found",
        targets, cidrs_queried, hostnames
    );

    let lines = render.render(&discovery.index);
    debug!("printing {} lines in {} mode", lines.len(), render.mode());

    let mut stdout = std::io::stdout().lock();
    for line in lines {
        if let Err(e) = writeln!(stdout, "{}", line) {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                return Ok(());
            }
            return Err(e.into());
        }
    }
    Ok(())
}
