// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface: one `pull` subcommand, parsed with `clap derive`.

use std::time::Duration;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "objmirror",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")"),
    about = "Incrementally mirrors an S3 prefix to a local directory"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mirror REMOTE_URI into LOCAL_PATH, once or on a periodic loop.
    Pull(PullArgs),
}

#[derive(Parser, Debug)]
pub struct PullArgs {
    /// s3://bucket/prefix to mirror from.
    pub remote_uri: String,

    /// Local directory to mirror into. Must already exist.
    pub local_path: String,

    /// Run a single cycle and exit instead of looping.
    #[arg(short, long)]
    pub once: bool,

    /// Interval between cycles in daemon mode.
    #[arg(short, long, default_value = "5s", value_parser = parse_duration)]
    pub interval: Duration,

    /// Address the health/metrics HTTP server binds to.
    #[arg(short, long, default_value = objmirror_engine::config::DEFAULT_STATUS_ADDR)]
    pub status_addr: String,

    /// Glob pattern to exclude from the mirror. Repeatable.
    #[arg(short, long = "exclude")]
    pub excludes: Vec<String>,

    /// Skip identity-cache warm-up from local content on startup.
    #[arg(long)]
    pub scratch: bool,

    /// Octal file mode applied to newly downloaded files.
    #[arg(short = 'm', long = "default-file-mode", default_value = "0664", value_parser = parse_octal_mode)]
    pub default_file_mode: u32,

    /// Override the S3 endpoint (for S3-compatible stores).
    #[arg(long)]
    pub s3_endpoint: Option<String>,

    /// Use plain HTTP against the configured S3 endpoint.
    #[arg(long)]
    pub disable_ssl: bool,
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}

fn parse_octal_mode(raw: &str) -> Result<u32, String> {
    u32::from_str_radix(raw.trim_start_matches("0o"), 8).map_err(|e| format!("invalid octal file mode {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_default_file_mode_as_octal() {
        assert_eq!(parse_octal_mode("0664").unwrap(), 0o664);
        assert_eq!(parse_octal_mode("0o775").unwrap(), 0o775);
        assert!(parse_octal_mode("not-octal").is_err());
    }

    #[test]
    fn parses_humantime_interval() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn pull_args_apply_documented_defaults() {
        let cli = Cli::parse_from(["objmirror", "pull", "s3://bucket/home", "/tmp/x"]);
        let Command::Pull(args) = cli.command;
        assert_eq!(args.interval, Duration::from_secs(5));
        assert_eq!(args.status_addr, ":8087");
        assert_eq!(args.default_file_mode, 0o664);
        assert!(!args.once);
        assert!(args.excludes.is_empty());
    }

    #[test]
    fn pull_args_parse_repeatable_excludes() {
        let cli = Cli::parse_from([
            "objmirror", "pull", "s3://bucket/home", "/tmp/x", "-e", "*.tmp", "-e", "config/**",
        ]);
        let Command::Pull(args) = cli.command;
        assert_eq!(args.excludes, vec!["*.tmp".to_string(), "config/**".to_string()]);
    }
}
