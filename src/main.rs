use std::io::{self, BufRead, Write};

use reldb::{Database, DatabaseConfig};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "> ";

fn main() -> io::Result<()> {
    // stdout carries query output only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match std::env::var_os("RELDB_DATA_DIR") {
        Some(dir) => DatabaseConfig::with_data_dir(dir),
        None => DatabaseConfig::default(),
    };
    let mut db = Database::with_config(config);

    let mut stdout = io::stdout().lock();
    write!(stdout, "{PROMPT}")?;
    stdout.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let query = line.trim();
        if query == "exit" || query == "quit" {
            break;
        }
        if !query.is_empty() {
            let output = db.transact(query);
            if !output.is_empty() {
                writeln!(stdout, "{output}")?;
            }
        }
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;
    }
    Ok(())
}
