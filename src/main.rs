//! biasbench CLI - load BBQ and render evaluation prompts.

use anyhow::{Context, Result};
use biasbench::{BbqLoader, Category, Config, DatasetTable, PromptStyle, QuestionAnsweringDataset};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "biasbench")]
#[command(version)]
#[command(about = "Load the Bias Benchmark for QA (BBQ) and render evaluation prompts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Dataset selection flags shared by the loading commands.
#[derive(Args)]
struct Selection {
    /// Bias category to load (all categories when omitted)
    #[arg(long)]
    category: Option<String>,

    /// Directory holding the category JSONL files
    #[arg(long)]
    root: Option<PathBuf>,
}

impl Selection {
    /// Command-line values win over the config file.
    fn resolve<'a>(&'a self, config: &'a Config) -> (PathBuf, Option<&'a str>) {
        let root = self
            .root
            .clone()
            .unwrap_or_else(|| config.data.root_path());
        let category = self.category.as_deref().or(config.data.category.as_deref());
        (root, category)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the bias categories and their source files
    Categories,

    /// Print the first questions of the dataset
    Show {
        #[command(flatten)]
        selection: Selection,

        /// Number of questions to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print evaluation prompts
    Prompts {
        #[command(flatten)]
        selection: Selection,

        /// Number of prompts to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Prompt style: unknown-last or indexed
        #[arg(short, long)]
        style: Option<PromptStyle>,
    },

    /// Export the dataset as a JSONL table keyed by example id
    Export {
        #[command(flatten)]
        selection: Selection,

        /// Path to output JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration and check the selected files exist
    Validate {
        #[command(flatten)]
        selection: Selection,
    },

    /// Show example configuration
    Example,
}

const DEFAULT_LIMIT: usize = 5;

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
}

fn print_example_config() {
    let example = r#"# biasbench configuration file

[data]
# Directory with Age.jsonl, Gender_identity.jsonl, ... (${VAR} is expanded)
root = "data/bbq"
# category = "gender_identity"  # omit to load every category
limit = 5

[prompt]
style = "unknown-last"  # or "indexed"

[output]
path = "output/bbq.jsonl"
"#;
    println!("{example}");
}

/// Resolve the selection against the config and load the dataset.
fn load(config: &Config, selection: &Selection) -> Result<QuestionAnsweringDataset> {
    let (root, category) = selection.resolve(config);

    info!(
        root = %root.display(),
        category = category.unwrap_or("all"),
        "Reading BBQ files"
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")?
            .progress_chars("##-"),
    );

    BbqLoader::new(&root)
        .fetch_with_progress(category, &pb)
        .with_context(|| format!("Failed to load BBQ from {}", root.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let load_config = || {
        Config::load(cli.config.as_deref())
            .with_context(|| format!("Failed to load config from {:?}", cli.config))
    };

    match &cli.command {
        Commands::Example => {
            print_example_config();
        }

        Commands::Categories => {
            for category in Category::ALL {
                println!("{:<20} {}", category.name(), category.file_name());
            }
        }

        Commands::Show { selection, limit } => {
            let config = load_config()?;
            let mut bbq = load(&config, selection)?;
            bbq.truncate(limit.or(config.data.limit).unwrap_or(DEFAULT_LIMIT));

            for q in &bbq.questions {
                let Some(annotations) = &q.bbq else {
                    continue;
                };
                let choices: Vec<String> = q.choices.iter().map(ToString::to_string).collect();
                println!("Q{}: {}", annotations.example_id, q.question);
                println!("Choices:        {:?}", choices);
                println!("Correct answer: {}", q.correct_answer);
                println!("Unknown answer: {}", annotations.unknown_answer);
            }
        }

        Commands::Prompts {
            selection,
            limit,
            style,
        } => {
            let config = load_config()?;
            let mut bbq = load(&config, selection)?;
            bbq.truncate(limit.or(config.data.limit).unwrap_or(DEFAULT_LIMIT));

            let renderer = style.unwrap_or(config.prompt.style).renderer();
            for (i, q) in bbq.questions.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                println!("{}", renderer.render(q));
            }
        }

        Commands::Export { selection, output } => {
            let config = load_config()?;
            let bbq = load(&config, selection)?;
            let output = output.clone().unwrap_or_else(|| config.output.path.clone());

            let table = DatasetTable::from_dataset(&bbq);
            table
                .write_jsonl(&output)
                .with_context(|| format!("Failed to export to {}", output.display()))?;

            println!("\n=== BBQ Export Complete ===");
            println!("Dataset:     {}", bbq.metadata.name);
            println!("Version:     {}", bbq.metadata.version);
            println!("Rows:        {}", table.len());
            println!("Output:      {output:?}");
        }

        Commands::Validate { selection } => {
            let config = load_config()?;
            let (root, category) = selection.resolve(&config);
            let categories = Category::select(category)?;

            let loader = BbqLoader::new(&root);
            let missing: Vec<PathBuf> = categories
                .iter()
                .map(|c| loader.category_path(*c))
                .filter(|p| !p.is_file())
                .collect();

            for path in &missing {
                warn!(path = %path.display(), "Missing category file");
            }
            if !missing.is_empty() {
                anyhow::bail!("{} of {} category files missing", missing.len(), categories.len());
            }

            info!("Configuration is valid");
            info!("  Root: {}", root.display());
            info!("  Categories: {}", categories.len());
            info!("  Prompt style: {:?}", config.prompt.style);
        }
    }

    Ok(())
}
