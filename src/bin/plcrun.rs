//! `plcrun` - headless scan-loop runner for a LAD or IR program file.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use ladder_plc::manager::RuntimeManager;

#[derive(Parser)]
#[command(author, version, about = "Run a ladder-logic program's scan cycle", long_about = None)]
struct Args {
    /// Path to a LAD JSON program file.
    #[arg(long, conflicts_with = "ir")]
    lad: Option<PathBuf>,

    /// Path to an IR JSON program file.
    #[arg(long, conflicts_with = "lad")]
    ir: Option<PathBuf>,

    /// Run exactly this many scans, then exit. Mutually exclusive with
    /// `--period-ms` (a fixed scan count vs. a periodic driver thread).
    #[arg(long, conflicts_with = "period_ms")]
    scans: Option<u64>,

    /// Drive scans periodically on a dedicated thread at this period, in
    /// milliseconds, until Ctrl-C.
    #[arg(long)]
    period_ms: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let manager = RuntimeManager::new();

    match (&args.lad, &args.ir) {
        (Some(path), None) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading LAD program {}", path.display()))?;
            manager
                .load_lad_str(&text)
                .context("compiling LAD program")?;
        }
        (None, Some(path)) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading IR program {}", path.display()))?;
            manager.load_ir_str(&text).context("loading IR program")?;
        }
        _ => anyhow::bail!("exactly one of --lad or --ir must be given"),
    }

    manager.subscribe(Box::new(|result| {
        println!(
            "scan {} ({} ms): {} tags",
            result.scan_number,
            result.scan_duration_ms,
            result.tag_values.len()
        );
    }));
    manager.subscribe_errors(Box::new(|err| {
        eprintln!("scan error: {err}");
    }));

    if let Some(n) = args.scans {
        for _ in 0..n {
            manager.step();
        }
        return Ok(());
    }

    let period = args.period_ms.unwrap_or(100);
    let mut manager = manager;
    manager.start(period);
    println!("running at {period} ms/scan, press Ctrl-C to stop");
    loop {
        thread::sleep(Duration::from_secs(3600));
    }
}
