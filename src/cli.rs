use clap::Parser;

use crate::io::FetchOptions;
use std::time::Duration;

pub const DEFAULT_REPOSITORIES: &[&str] = &[
    "http://dl-cdn.alpinelinux.org/alpine/v3.10/main/x86_64/APKINDEX.tar.gz",
    "http://dl-cdn.alpinelinux.org/alpine/v3.10/community/x86_64/APKINDEX.tar.gz",
];

#[derive(Parser, Debug)]
#[command(name = "apk-latest")]
#[command(version)]
#[command(about = "Print the latest version of Alpine packages", long_about = None)]
#[command(after_help = "Examples:\n  \
  apk-latest musl busybox                 newest musl and busybox in the default repositories\n  \
  apk-latest -X ./APKINDEX.tar.gz zlib    look up zlib in a local index archive")]
pub struct Cli {
    /// Print the latest version of PACKAGEs
    #[arg(value_name = "PACKAGE", required = true)]
    pub packages: Vec<String>,

    /// Use packages from REPO (URL or path, repeatable, scanned in order)
    #[arg(
        short = 'X',
        long = "repository",
        value_name = "REPO",
        default_values_t = DEFAULT_REPOSITORIES.iter().map(|r| r.to_string())
    )]
    pub repositories: Vec<String>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Retries for HTTP connection errors
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub retries: u32,

    /// More log output (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout),
            max_retry: self.retries.max(1),
        }
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}
