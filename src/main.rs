// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use rpmal::packages::{self, CandidatePackage};
use rpmal::{Dependency, Evr};
use std::cmp::Ordering;
use std::num::NonZeroUsize;
use tracing::info;

#[derive(Parser)]
#[command(name = "rpmal")]
#[command(author, version, about = "Find which install candidates satisfy package dependencies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every candidate's requirements are satisfied by the candidate set
    Check {
        /// Candidate sources (.rpm files or .json manifests)
        #[arg(required = true)]
        paths: Vec<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Package pool growth increment
        #[arg(long, default_value = "5")]
        delta: NonZeroUsize,
    },
    /// List candidates satisfying a dependency
    Whatprovides {
        /// Dependency, e.g. "foo >= 1.0" or /usr/bin/tool
        dependency: String,
        /// Candidate sources (.rpm files or .json manifests)
        #[arg(required = true)]
        paths: Vec<String>,
        /// Query color bits (0 accepts any color)
        #[arg(short, long, default_value_t = 0)]
        color: u32,
        /// Package pool growth increment
        #[arg(long, default_value = "5")]
        delta: NonZeroUsize,
    },
    /// Compare two epoch:version-release strings
    Vercmp {
        /// First EVR
        a: String,
        /// Second EVR
        b: String,
    },
}

/// Load candidates from every source path
fn load_all(paths: &[String]) -> Result<Vec<Box<dyn CandidatePackage>>> {
    let mut candidates = Vec::new();
    for path in paths {
        let loaded = packages::load_candidates(path)?;
        info!("Loaded {} candidate(s) from {}", loaded.len(), path);
        candidates.extend(loaded);
    }
    Ok(candidates)
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { paths, json, delta }) => {
            let candidates = load_all(&paths)?;
            let pool = packages::load_pool(&candidates, delta);
            info!(
                "Indexed {} provides from {} candidate(s)",
                pool.index_len(),
                pool.len()
            );

            let report = rpmal::check::check(&candidates, &pool);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for package in &report.packages {
                    if package.unresolved.is_empty() {
                        continue;
                    }
                    println!("{}:", package.package);
                    for requirement in &package.unresolved {
                        println!("  unresolved: {}", requirement);
                    }
                }
                println!(
                    "\nChecked {} package(s), {} unresolved requirement(s)",
                    report.packages.len(),
                    report.unresolved_count()
                );
            }

            if !report.is_satisfied() {
                return Err(anyhow::anyhow!(
                    "{} unresolved requirement(s)",
                    report.unresolved_count()
                ));
            }
            Ok(())
        }
        Some(Commands::Whatprovides {
            dependency,
            paths,
            color,
            delta,
        }) => {
            let dep = dependency.parse::<Dependency>()?.with_color(color);
            let candidates = load_all(&paths)?;
            let pool = packages::load_pool(&candidates, delta);

            let found = pool.all_satisfies_depend(&dep);
            if found.is_empty() {
                return Err(anyhow::anyhow!("No candidate provides {}", dep));
            }

            for ix in &found.keys {
                println!("{}", candidates[*ix].nevra());
            }
            Ok(())
        }
        Some(Commands::Vercmp { a, b }) => {
            let a = a.parse::<Evr>()?;
            let b = b.parse::<Evr>()?;
            let op = match a.compare(&b) {
                Ordering::Less => "<",
                Ordering::Equal => "==",
                Ordering::Greater => ">",
            };
            println!("{} {} {}", a, op, b);
            Ok(())
        }
        None => {
            println!("rpmal - available package index");
            println!("Run 'rpmal --help' for usage information");
            Ok(())
        }
    }
}
