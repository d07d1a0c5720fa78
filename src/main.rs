//! kge-dataset CLI: build, split and inspect knowledge-graph datasets.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use kge_dataset::binding::RawTriplet;
use kge_dataset::config::DatasetConfig;
use kge_dataset::dataset::Dataset;
use kge_dataset::endpoint::decode_results;

#[derive(Parser)]
#[command(name = "kge-dataset", version, about = "Knowledge-graph dataset builder")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the endpoint for an n-level neighbourhood and save the dataset.
    Fetch {
        /// Number of hops to follow.
        #[arg(long, default_value = "1")]
        levels: usize,

        /// Raw SPARQL appended to the generated query.
        #[arg(long, default_value = "")]
        extra: String,

        /// Fetch in pages of this many rows.
        #[arg(long)]
        page_size: Option<usize>,

        /// Maximum number of pages when paging.
        #[arg(long, default_value = "30")]
        max_pages: usize,

        /// Keep IRIs only, even if literals are admitted.
        #[arg(long)]
        only_uri: bool,

        /// Output container.
        #[arg(long)]
        out: PathBuf,

        /// Seed for the train/valid/test shuffle.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Build a dataset from local files and save it.
    Ingest {
        /// SPARQL JSON results, or a JSON array of rows.
        #[arg(long, conflicts_with = "csv", required_unless_present = "csv")]
        json: Option<PathBuf>,

        /// Delimited `object,predicate,subject` lines.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Column separator for --csv.
        #[arg(long, default_value = ",")]
        sep: char,

        /// Keep IRIs only, even if literals are admitted.
        #[arg(long)]
        only_uri: bool,

        /// Output container.
        #[arg(long)]
        out: PathBuf,

        /// Seed for the train/valid/test shuffle.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show a saved dataset.
    Info {
        /// Container to inspect.
        file: PathBuf,

        /// List every entity, relation and triplet.
        #[arg(long)]
        verbose: bool,
    },

    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DatasetConfig::load(path)?,
        None => DatasetConfig::default(),
    };

    match cli.command {
        Commands::Fetch {
            levels,
            extra,
            page_size,
            max_pages,
            only_uri,
            out,
            seed,
        } => {
            let endpoint = config.endpoint();
            let only_identifiers = only_uri || config.only_identifiers;
            let mut dataset = Dataset::from_config(&config);

            let stats = match page_size {
                Some(size) => dataset.load_paged(
                    &endpoint,
                    levels,
                    &extra,
                    size,
                    max_pages,
                    only_identifiers,
                )?,
                None => dataset.load_levels(&endpoint, levels, &extra, only_identifiers)?,
            };
            println!("Fetched {stats}");
            save(&mut dataset, &out, &config, seed)?;
        }

        Commands::Ingest {
            json,
            csv,
            sep,
            only_uri,
            out,
            seed,
        } => {
            let mut dataset = Dataset::from_config(&config);
            let stats = match (json, csv) {
                (Some(path), _) => {
                    let content = std::fs::read_to_string(&path).into_diagnostic()?;
                    let rows = decode_results(&content)
                        .or_else(|_| serde_json::from_str::<Vec<RawTriplet>>(&content))
                        .into_diagnostic()?;
                    dataset.load_bindings(&rows, only_uri || config.only_identifiers)
                }
                (None, Some(path)) => {
                    let file = std::fs::File::open(&path).into_diagnostic()?;
                    dataset.load_delimited(BufReader::new(file), sep)?
                }
                (None, None) => miette::bail!("pass --json or --csv"),
            };
            println!("Ingested {stats}");
            save(&mut dataset, &out, &config, seed)?;
        }

        Commands::Info { file, verbose } => {
            let dataset = Dataset::open(&file)?;
            if verbose {
                print!("{}", dataset.listing());
            } else {
                println!("{}", dataset.info());
            }
        }

        Commands::Config => {
            let rendered = config.to_toml().map_err(|m| miette::miette!("{m}"))?;
            print!("{rendered}");
        }
    }

    Ok(())
}

fn save(dataset: &mut Dataset, out: &Path, config: &DatasetConfig, seed: Option<u64>) -> Result<()> {
    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    let split = dataset.save_with(out, config.train_ratio, rng.as_mut())?;
    println!("{}", dataset.info());
    println!(
        "Saved {} (train {}, valid {}, test {})",
        out.display(),
        split.train.len(),
        split.valid.len(),
        split.test.len()
    );
    Ok(())
}
