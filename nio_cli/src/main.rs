use std::{
    fs,
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use clap_verbosity_flag::InfoLevel;
use directories::ProjectDirs;
use nio_fs::Origins;
use tracing::info;

use crate::{config::CliConfig, script::parse_line, session::Session};

mod config;
mod script;
mod session;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// origin whose storage the commands run against
    #[arg(short, long, value_name = "ORIGIN")]
    origin: Option<String>,

    /// config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Go through the async API instead of the blocking one
    #[arg(long = "async", action = ArgAction::SetTrue)]
    nonblocking: bool,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<InfoLevel>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script of storage commands
    Run {
        script: PathBuf,
        /// Continue after a failing command instead of stopping
        #[arg(long, action = ArgAction::SetTrue)]
        keep_going: bool,
    },
    /// Read commands from stdin, one per line
    Shell,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum ConfigCmd {
    /// Creates the config file with default values if it doesn't exist
    Init,
    /// Prints the config file location
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let config_file = match cli.config {
        Some(path) => path,
        None => ProjectDirs::from("", "", "nio")
            .context("failed to determine config directory path")?
            .config_dir()
            .join("config.toml"),
    };

    let (lines, keep_going) = match cli.cmd {
        Commands::Config { cmd } => {
            match cmd {
                ConfigCmd::Init => {
                    if CliConfig::init(&config_file)? {
                        info!("wrote default config to {}", config_file.display());
                    } else {
                        info!("config already exists at {}", config_file.display());
                    }
                }
                ConfigCmd::Path => println!("{}", config_file.display()),
            }
            return Ok(());
        }
        Commands::Run { script, keep_going } => {
            let text = fs::read_to_string(&script)
                .with_context(|| format!("failed to read script {}", script.display()))?;
            let lines: Vec<io::Result<String>> = text.lines().map(|l| Ok(l.to_owned())).collect();
            let lines: Box<dyn Iterator<Item = io::Result<String>>> = Box::new(lines.into_iter());
            (lines, keep_going)
        }
        Commands::Shell => {
            let lines: Box<dyn Iterator<Item = io::Result<String>>> =
                Box::new(io::stdin().lock().lines());
            (lines, true)
        }
    };

    let config = CliConfig::load(&config_file)?;
    let origin = cli.origin.unwrap_or(config.origin);
    let origins = Origins::new(config.engine);
    let engine = origins.engine(&origin);
    info!(origin = %origin, nonblocking = cli.nonblocking, "opening storage");

    let mut session = if cli.nonblocking {
        Session::nonblocking(engine)
    } else {
        Session::blocking(engine)
    };

    let mut failures = 0usize;
    for (number, line) in lines.enumerate() {
        let line = line.context("failed to read input")?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) if keep_going => {
                println!("error: line {}: {:#}", number + 1, err);
                failures += 1;
                continue;
            }
            Err(err) => {
                session.close_all().await;
                bail!("line {}: {:#}", number + 1, err);
            }
        };
        match session.execute(command).await {
            Ok(out) => {
                if !out.is_empty() {
                    println!("{}", out);
                }
            }
            Err(err) => {
                println!("{}", session::describe_error(&err));
                failures += 1;
                if !keep_going {
                    break;
                }
            }
        }
    }
    session.close_all().await;

    if failures > 0 {
        bail!("{} command(s) failed", failures);
    }
    Ok(())
}
