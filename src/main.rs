use clap::{error::ErrorKind, Parser};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;
use vixcontango::{fetch, get_and_save_vix_contango, ContangoResult};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Download the VIX futures contango history and save it as vix_contago.csv"
)]
struct Args {
    /// Folder the CSV is written into; must exist.
    destination: PathBuf,
    /// Page holding the historical contango table.
    #[arg(long, default_value = fetch::DEFAULT_URL)]
    url: Url,
    /// Give up on the download after this many seconds (default: wait forever).
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// Help and version requests succeed; every other argument error is a failed run.
fn arg_error_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

async fn run(args: &Args) -> ContangoResult<PathBuf> {
    let client = fetch::build_client(args.timeout_secs.map(Duration::from_secs))?;
    get_and_save_vix_contango(&client, &args.url, &args.destination).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // diagnostics go to stdout
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stdout)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(arg_error_exit_code(&e));
        }
    };

    match run(&args).await {
        Ok(path) => {
            info!(path = %path.display(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                "get_and_save_vix_contango(): Fail to get data from VIX central. {}",
                e
            );
            ExitCode::FAILURE
        }
    }
}
