use anyhow::Context;
use clap::Parser;
use sipdns_domain::{CliOverrides, SipUri};
use std::net::SocketAddr;
use tracing::info;

mod bootstrap;
mod resolve;

#[derive(Parser)]
#[command(name = "sipdns")]
#[command(version)]
#[command(about = "Locate SIP servers for a URI using NAPTR, SRV and A/AAAA records (RFC 3263)")]
struct Cli {
    /// SIP or SIPS URI to resolve, e.g. sip:example.com
    uri: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Use the operating system resolver (address records only)
    #[arg(long)]
    system: bool,

    /// Recursive DNS server to query; may be repeated
    #[arg(long = "server", value_name = "ADDR")]
    servers: Vec<SocketAddr>,

    /// Bypass the record cache
    #[arg(long)]
    no_cache: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let uri: SipUri = cli
        .uri
        .parse()
        .with_context(|| format!("invalid URI '{}'", cli.uri))?;

    let overrides = CliOverrides {
        log_level: cli.log_level,
        servers: cli.servers,
        system_resolver: cli.system,
        disable_cache: cli.no_cache,
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;

    bootstrap::init_logging(&config);
    info!(uri = %uri, "Starting sipdns v{}", env!("CARGO_PKG_VERSION"));

    // Dispatcher completions run on this thread, so a current-thread runtime
    // with a LocalSet is all the resolver needs.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    let local = tokio::task::LocalSet::new();

    let tuples = local.block_on(&runtime, resolve::run(&config, &uri));
    if tuples.is_empty() {
        anyhow::bail!("no servers found for {}", uri);
    }

    for tuple in &tuples {
        println!("{}", tuple);
    }
    Ok(())
}
