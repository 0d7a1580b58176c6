// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redeploy")]
#[command(about = "Build and roll out containers on a single remote host")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: redeploy.yml in the current directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install or upgrade Docker on a remote host over SSH
    Config {
        /// Remote host, as host, user@host or user@host:port
        host: String,

        /// SSH port
        #[arg(short, long)]
        port: Option<u16>,

        /// SSH login user
        #[arg(short, long)]
        username: Option<String>,

        /// SSH password (key or agent authentication is used when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Build service images on the runtime behind URL
    Build {
        /// Runtime URL: ssh://[user@]host[:port][/socket], tcp://host:port, unix:///path
        url: String,

        /// Service build context directories; the image name is the directory name
        services: Vec<PathBuf>,

        /// Image tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Replace running containers of each service with the tagged image
    Deploy {
        /// Runtime URL: ssh://[user@]host[:port][/socket], tcp://host:port, unix:///path
        url: String,

        /// Service directories; the image name is the directory name
        services: Vec<PathBuf>,

        /// Image tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Keep a running container that already has the same version
        #[arg(long)]
        skip_equal: bool,
    },

    /// List containers managed by redeploy
    Status {
        /// Runtime URL: ssh://[user@]host[:port][/socket], tcp://host:port, unix:///path
        url: String,
    },
}
