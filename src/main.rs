use std::path::PathBuf;

use clap::Parser;

/// TutorEase - students, guardians and who looks after whom
#[derive(Parser, Debug)]
#[command(name = "tutorease", version)]
struct Args {
    /// Database file path (default: .data/tutorease.db)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    // Logs go to stderr so they never mix with REPL output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    let db_path = match args.file {
        Some(path) => path,
        None => {
            let dir = PathBuf::from(".data");
            if let Err(e) = std::fs::create_dir_all(&dir) {
                eprintln!("Error: cannot create {}: {}", dir.display(), e);
                std::process::exit(1);
            }
            dir.join("tutorease.db")
        }
    };

    tutorease::cli::run(&db_path);
}
