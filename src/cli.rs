use anyhow::{Result, bail};
use clap::{ArgGroup, Parser};
use fsfreeze_core::{Mode, Outcome, Request};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Suspend or resume access to a mounted filesystem",
    long_about = None,
    infer_long_args = true,
    group(
        ArgGroup::new("action")
            .required(true)
            .multiple(true)
            .args(["freeze", "unfreeze", "auto_unfreeze"])
    )
)]
pub struct Args {
    /// Freeze the filesystem
    #[arg(short, long)]
    pub freeze: bool,

    /// Unfreeze the filesystem
    #[arg(short, long, conflicts_with_all = ["freeze", "auto_unfreeze"])]
    pub unfreeze: bool,

    /// Freeze, then automatically unfreeze after SECS (fractions allowed)
    #[arg(short = 'U', long, value_name = "SECS", value_parser = parse_timeout)]
    pub auto_unfreeze: Option<Duration>,

    /// Log more; repeat for debug output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "FILTER", env = "FSFREEZE_LOG", default_value = "warn")]
    pub log: String,

    /// Mount point of the filesystem
    #[arg(value_name = "MOUNTPOINT")]
    pub mountpoint: PathBuf,
}

impl Args {
    pub fn mode(&self) -> Result<Mode> {
        match (self.freeze, self.unfreeze, self.auto_unfreeze) {
            (_, true, Some(_)) => bail!("--unfreeze and --auto-unfreeze are mutually exclusive"),
            (true, true, None) => bail!("--freeze and --unfreeze are mutually exclusive"),
            (false, true, None) => Ok(Mode::Unfreeze),
            (_, false, Some(timeout)) if timeout.is_zero() => bail!("timeout cannot be zero"),
            (_, false, Some(timeout)) => Ok(Mode::Freeze {
                auto_unfreeze: Some(timeout),
            }),
            (true, false, None) => Ok(Mode::Freeze {
                auto_unfreeze: None,
            }),
            (false, false, None) => bail!("one of --freeze, --unfreeze or --auto-unfreeze is required"),
        }
    }

    pub fn request(&self) -> Result<Request> {
        Ok(Request {
            path: self.mountpoint.clone(),
            mode: self.mode()?,
        })
    }

    pub fn log_filter(&self) -> &str {
        match self.verbose {
            0 => &self.log,
            1 => "info",
            _ => "debug",
        }
    }
}

/// Parse `SECONDS[.FRACTION]` into a nonzero duration, keeping microseconds.
pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid timeout value: '{value}'");
    let (secs, frac) = value.split_once('.').unwrap_or((value, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (secs.is_empty() && frac.is_empty()) || !digits(secs) || !digits(frac) {
        return Err(invalid());
    }

    let secs: u64 = match secs {
        "" => 0,
        s => s.parse().map_err(|_| invalid())?,
    };
    let micros = frac
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(6)
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));

    let timeout = Duration::new(secs, micros * 1_000);
    if timeout.is_zero() {
        return Err("timeout cannot be zero".into());
    }
    Ok(timeout)
}

pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub async fn run() -> Result<()> {
    run_with_args(Args::parse()).await.map(|_| ())
}

async fn run_with_args(args: Args) -> Result<Outcome> {
    init_logging(args.log_filter());
    let request = args.request()?;
    tracing::debug!(?request, "dispatching");
    let outcome = fsfreeze_core::execute(request).await?;
    tracing::debug!(?outcome, "finished");
    Ok(outcome)
}
