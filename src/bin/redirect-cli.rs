use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use redirect_tree::config::{load_config, ConfigError};
use redirect_tree::routing::{Directory, Outcome};

#[derive(Parser)]
#[command(name = "redirect-cli")]
#[command(about = "Offline tooling for redirect-tree configurations", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, default_value = "redirects.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration
    Check,
    /// List every reachable redirect path
    Routes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve a path without starting a server
    Resolve {
        path: String,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Validation(errors)) => {
            eprintln!("{}: {} problem(s)", cli.config.display(), errors.len());
            for error in errors {
                eprintln!("  - {error}");
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };
    let directory = Directory::from_config(&config)?;

    match cli.command {
        Commands::Check => {
            println!(
                "{}: ok ({} mounts, {} routes)",
                cli.config.display(),
                directory.len(),
                directory.routes().len()
            );
        }
        Commands::Routes { json } => {
            let routes = directory.routes();
            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else {
                let width = routes.iter().map(|r| r.path.len()).max().unwrap_or(0);
                for route in routes {
                    println!("{:width$}  {:15}  {}", route.path, route.service.name(), route.template);
                }
            }
        }
        Commands::Resolve { path } => match directory.resolve("", &path) {
            Outcome::Redirect(resolution) => println!("307 {}", resolution.location),
            Outcome::NotFound { path } => {
                println!("404 Not Found: {path}");
                return Ok(ExitCode::FAILURE);
            }
            Outcome::Fallback(page) => println!("{} {}", page.status, page.body),
            Outcome::Unbound(e) => {
                println!("500 {e}");
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
