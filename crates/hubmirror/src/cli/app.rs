use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "hubmirror",
    version = env!("CARGO_PKG_VERSION"),
    about,
    long_about = None,
    propagate_version = true
)]
pub struct App {
    /// Config file (default: ~/.hubmirror/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output; repeat for debug
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "m", name = "mirrors", about = "List the mirror candidates of a URL")]
    Mirrors(UrlArg),
    #[command(alias = "r", name = "resolve", about = "Print the fastest reachable mirror of a URL")]
    Resolve(ResolveArg),
    #[command(name = "race", about = "Race the mirrors of a URL once and show every outcome")]
    Race(UrlArg),
    #[command(alias = "c", name = "check", about = "Check that a URL answers a HEAD request")]
    Check(UrlArg),
    #[command(alias = "dl", name = "download", about = "Download a URL through its fastest mirror")]
    Download(DownloadArg),
}

#[derive(Clone, Debug, Args)]
pub struct UrlArg {
    pub url: String,
}

#[derive(Clone, Debug, Args)]
pub struct ResolveArg {
    pub url: String,

    /// Race the mirrors of this URL instead of URL itself
    #[arg(long, value_name = "URL")]
    pub test_url: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct DownloadArg {
    pub url: String,

    /// Output file (default: last segment of the URL)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
