use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kiosk_core::impls::{SimulatedNetwork, TracingTelemetry};
use kiosk_core::{KioskConfig, KioskShell};

/// Interactive kiosk terminal backed by a simulated network.
#[derive(Debug, Parser)]
#[command(name = "kiosk", version)]
struct Args {
    /// Start with the network down.
    #[arg(long)]
    offline: bool,

    /// Override the processing delay (milliseconds).
    #[arg(long, env = "KIOSK_PROCESSING_DELAY_MS")]
    delay_ms: Option<u64>,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

/// `RUST_LOG` で出力レベルを調整（既定: info,kiosk_core=debug）
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kiosk_core=debug"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if json || std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

const HELP: &str = "\
commands:
  scan <code>   submit a scan
  tile <id>     press a tile
  key <hotkey>  press the tile bound to a hotkey (F1..F6)
  toggle        flip connectivity by hand
  online        raise a platform online signal
  offline       raise a platform offline signal
  view          show status and queue preview
  queue         dump the queue as JSON
  help          this text
  quit          unmount and exit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let mut config = KioskConfig::from_env().context("loading KIOSK_* configuration")?;
    if let Some(delay_ms) = args.delay_ms {
        config.processing_delay_ms = delay_ms;
    }

    let network = Arc::new(if args.offline {
        SimulatedNetwork::offline()
    } else {
        SimulatedNetwork::online()
    });
    let mut shell = KioskShell::builder(config)
        .platform(network.clone())
        .telemetry(Arc::new(TracingTelemetry))
        .mount()
        .context("mounting kiosk shell")?;

    for row in shell.tiles().rows() {
        let line: Vec<String> = row
            .iter()
            .map(|t| format!("[{} {}]", t.hotkey.as_deref().unwrap_or("--"), t.id))
            .collect();
        println!("{}", line.join(" "));
    }
    print!("{}", shell.view().render());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        match command {
            "" => continue,
            "scan" => {
                // 空のスキャンは黙って無視される
                shell.submit_scan(arg);
            }
            "tile" => {
                if let Err(e) = shell.press_tile(arg) {
                    warn!(error = %e, "tile press rejected");
                }
            }
            "key" => {
                if let Err(e) = shell.press_hotkey(arg) {
                    warn!(error = %e, "hotkey press rejected");
                }
            }
            "toggle" => {
                shell.toggle_network();
            }
            "online" => network.go_online(),
            "offline" => network.go_offline(),
            "view" => {}
            "queue" => {
                println!("{}", serde_json::to_string_pretty(&shell.queue())?);
                continue;
            }
            "help" => {
                println!("{HELP}");
                continue;
            }
            "quit" | "exit" => break,
            other => {
                warn!(command = other, "unknown command (try `help`)");
                continue;
            }
        }

        // platform シグナルは listener task 経由なので、一度 yield してから表示する
        tokio::task::yield_now().await;
        print!("{}", shell.view().render());
    }

    info!("command loop finished; shutting down");
    shell.unmount().await;
    Ok(())
}
