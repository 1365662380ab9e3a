//! cidrdb-rest: REST lookup service over a compiled CIDR database.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use cidrdb::{create_router, serve, AppState, Store};

#[derive(Parser)]
#[command(name = "cidrdb-rest")]
#[command(version)]
#[command(about = "Serve CIDR lookups over HTTP", long_about = None)]
struct Cli {
    /// Address to bind, e.g. 0.0.0.0
    address: String,

    /// Port to listen on
    port: u16,

    /// Compiled CIDR database
    db: PathBuf,
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    if !cli.db.exists() {
        eprintln!("Can't open {} (No such file)", cli.db.display());
        process::exit(1);
    }

    log::info!("loading {}", cli.db.display());
    let store = Store::new(&cli.db);
    let index = match store.read() {
        Ok(index) => index,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    log::info!("loaded {} prefixes", index.len());

    let router = create_router(AppState::new(index, store));

    if let Err(e) = serve(router, &cli.address, cli.port).await {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn init_logging() {
    let default_level = if std::env::var_os("DEBUG").is_some_and(|v| !v.is_empty()) {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
