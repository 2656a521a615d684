use std::io::{stdout, Write};
use std::process::exit;
use std::time::Duration;

mod args;
mod config;

use anyhow::{bail, Context, Result};
use clap::Command;
use pkgstat_console::{due_to, PkgstatLayer};
use pkgstat_contents::{
    arch::{ArchitectureSource, IndexPageScraper},
    decompress, parse, rank,
    report::{numbered_list, report},
};
use pkgstat_fetch::{FetchError, Fetcher};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::args::CliArgs;
use crate::config::Config;

const LOG_ENV: &str = "PKGSTAT_LOG";

/// Exit codes:
/// 0 => report or architecture list printed
/// 1 => bad arguments, unknown architecture, network or decoding failure
fn main() {
    let cmd = args::command_builder();
    let matches = match cmd.clone().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            e.print().ok();
            exit(clap_exit_code(&e));
        }
    };

    let args = CliArgs::from_matches(&matches);
    init_logger(args.debug);

    let code = match try_main(args, cmd) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            error!("{e}");
            e.chain().skip(1).for_each(|cause| {
                due_to!("{cause}");
            });
            1
        }
    };

    exit(code);
}

/// `--help` exits 0, every malformed invocation exits 1
fn clap_exit_code(e: &clap::Error) -> i32 {
    if e.use_stderr() {
        1
    } else {
        0
    }
}

fn init_logger(debug: bool) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) if debug => {
            EnvFilter::new("info,pkgstat=debug,pkgstat_contents=debug,pkgstat_fetch=debug")
        }
        Err(_) => EnvFilter::new("info"),
    };

    tracing_subscriber::registry()
        .with(PkgstatLayer::new().with_filter(filter))
        .init();
}

fn try_main(args: CliArgs, cmd: Command) -> Result<i32> {
    run(args, cmd, stdout().lock())
}

fn run(args: CliArgs, mut cmd: Command, mut out: impl Write) -> Result<i32> {
    debug!("pkgstat version: {}\n{args:#?}", env!("CARGO_PKG_VERSION"));

    let config = Config::read(args.config.as_deref())?;
    let mirror = args
        .mirror
        .clone()
        .unwrap_or_else(|| config.mirror().to_string());
    let timeout = config.timeout();

    let fetcher = Fetcher::builder()
        .base_url(mirror)
        .timeout(timeout)
        .build()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    if args.list {
        info!("Show list architecture tags there are files for");
        let archs = architectures(&runtime, &fetcher, &IndexPageScraper, timeout)?;
        numbered_list(&archs, &mut out)?;

        return Ok(0);
    }

    let Some(arch) = args.arch else {
        error!("arch arg is required!");
        write!(out, "{}", cmd.render_help())?;
        out.flush()?;
        return Ok(1);
    };

    debug!("Checking for arch=>{arch}<");
    let archs = architectures(&runtime, &fetcher, &IndexPageScraper, timeout)?;
    check_arch(&archs, &arch)?;
    debug!("Processing package statistics for arch=>{arch}<");

    debug!("Requested {} entries", args.count);
    info!("Package statistics for arch=>{arch}<:");

    let data = runtime
        .block_on(fetcher.fetch_contents(&arch))
        .map_err(|e| fetch_error(e, timeout))?;
    let text = decompress(&data)
        .with_context(|| format!("Failed to decode Contents-{arch}.gz"))?;
    let index = parse(&text);
    let top = rank(&index, args.count);

    report(&top, &mut out)?;

    Ok(0)
}

fn check_arch(archs: &[String], arch: &str) -> Result<()> {
    if !archs.iter().any(|x| x == arch) {
        bail!("No Contents-{arch}.gz file found! Please check arch and rerun.");
    }

    Ok(())
}

fn architectures(
    runtime: &Runtime,
    fetcher: &Fetcher,
    source: &dyn ArchitectureSource,
    timeout: Duration,
) -> Result<Vec<String>> {
    let listing = runtime
        .block_on(fetcher.fetch_listing())
        .map_err(|e| fetch_error(e, timeout))?;

    Ok(source.architectures(&listing))
}

fn fetch_error(e: FetchError, timeout: Duration) -> anyhow::Error {
    if e.is_timeout() {
        let secs = timeout.as_secs();
        anyhow::Error::new(e).context(format!("Mirror did not answer within {secs} seconds"))
    } else {
        e.into()
    }
}
