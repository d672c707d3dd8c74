use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dir_tree::{run, write_output, AppError, Dependencies, OutputFormat, Settings};

#[derive(Parser)]
#[command(name = "dir-tree")]
#[command(about = "Print the directory tree below a path", long_about = None)]
struct Cli {
    /// Directory to walk (falls back to DIR_TREE_ROOT, then ".")
    root: Option<String>,

    /// Timeout for the whole walk in milliseconds (falls back to DIR_TREE_TIMEOUT_MS)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Number of directories listed concurrently (falls back to DIR_TREE_WORKERS)
    #[arg(long)]
    workers: Option<usize>,

    /// Width of the branch line
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Spaces between the branch line and the name
    #[arg(long, default_value = "1")]
    pad: usize,

    /// Emit JSON instead of an ASCII tree
    #[arg(long)]
    json: bool,

    /// Keep directory listing order instead of sorting by name
    #[arg(long)]
    no_sort: bool,

    /// Descend into symlinked directories; without it they are skipped
    #[arg(long)]
    follow_links: bool,
}

impl Cli {
    /// Layer command line arguments over environment settings.
    fn into_settings(self) -> Result<Settings, AppError> {
        let mut settings = Settings::from_env()?;

        if let Some(root) = self.root {
            settings.root = root;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            settings.timeout = Duration::from_millis(timeout_ms);
        }
        if let Some(workers) = self.workers {
            settings.workers = workers;
        }
        settings.indent = self.indent;
        settings.pad = self.pad;
        settings.sort = !self.no_sort;
        if self.follow_links {
            settings.follow_links = true;
        }
        if self.json {
            settings.output = OutputFormat::Json;
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.into_settings().and_then(Dependencies::new) {
        Ok(deps) => run(&deps).await,
        Err(e) => Err(e),
    }
    .and_then(|output| write_output(&mut std::io::stdout().lock(), &output));

    match result {
        Ok(()) => {
            info!("Walk complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Walk failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
