use std::sync::Arc;

use shard_router::discovery::DiscoveryService;
use shard_router::forwarding::{build_http_client, ShardClient};
use shard_router::gateway::{app, RouterContext};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SHARDS: &str = "127.0.0.1:8011,127.0.0.1:8021,127.0.0.1:8031";

struct RouterArgs {
    port: u16,
    bootstrap: Vec<String>,
    log_level: tracing::Level,
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> anyhow::Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))
}

fn parse_args(args: &[String]) -> anyhow::Result<RouterArgs> {
    let mut port = DEFAULT_PORT;
    let mut shards = DEFAULT_SHARDS.to_string();
    let mut log_level = tracing::Level::INFO;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                port = flag_value(args, i, "--port")?.parse()?;
                i += 2;
            }
            "--shards" => {
                shards = flag_value(args, i, "--shards")?.to_string();
                i += 2;
            }
            "--log-level" => {
                log_level = flag_value(args, i, "--log-level")?.parse()?;
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: {} [--port <port>] [--shards <host:port,host:port,...>] [--log-level <level>]",
                    args[0]
                );
                eprintln!("Example: {} --port 3000 --shards 10.0.0.1:8011,10.0.0.2:8021", args[0]);
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    let bootstrap = shards.split(',').map(|s| s.trim().to_string()).collect();

    Ok(RouterArgs {
        port,
        bootstrap,
        log_level,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args)?;

    tracing_subscriber::fmt().with_max_level(args.log_level).init();

    tracing::info!("Starting router node");
    tracing::info!(
        "Will query shards at {:?} for cluster configuration",
        args.bootstrap
    );

    // One pooled client for the whole process, shared by discovery and
    // forwarding.
    let http_client = build_http_client()?;

    let ctx = Arc::new(RouterContext {
        discovery: DiscoveryService::new(args.bootstrap, http_client.clone()),
        shards: ShardClient::new(http_client),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("Router listening on port {}", args.port);

    axum::serve(listener, app(ctx)).await?;

    Ok(())
}
