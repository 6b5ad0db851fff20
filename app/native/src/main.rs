//! Backdrop CLI entry point.

use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(err) = backdrop_lib::cli::run() {
        eprintln!("backdrop: {err}");
        std::process::exit(1);
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `backdrop=info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("backdrop=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
