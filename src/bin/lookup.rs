//! cidrdb-lookup: query a compiled CIDR database from the command line.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use cidrdb::{compile_file, parse_ipv4, Store};

#[derive(Parser)]
#[command(name = "cidrdb-lookup")]
#[command(version)]
#[command(about = "Look up the CIDR prefixes covering an IPv4 address", long_about = None)]
struct Cli {
    /// Source text corpus, compiled to the database when it is missing
    #[arg(long = "in", value_name = "PATH")]
    input: Option<PathBuf>,

    /// Compiled CIDR database
    #[arg(long, value_name = "PATH")]
    db: PathBuf,

    /// IPv4 address to look up
    #[arg(long, value_name = "ADDRESS")]
    ip: String,
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    if let Err(e) = run(&cli) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> cidrdb::Result<()> {
    if !cli.db.exists() {
        let input = cli.input.as_deref().filter(|p| p.exists()).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: no database and no readable input corpus", cli.db.display()),
            )
        })?;

        let stats = compile_file(input, &cli.db)?;
        log::info!(
            "compiled {}: {} records written, {} tokens skipped",
            cli.db.display(),
            stats.emitted,
            stats.skipped
        );
    }

    let addr = parse_ipv4(&cli.ip)?;
    let index = Store::new(&cli.db).read()?;

    for cidr in index.lookup(addr) {
        println!("{}", cidr);
    }

    Ok(())
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
