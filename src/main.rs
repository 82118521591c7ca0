use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use polymath::{DialogueMode, PathType};

mod commands;

use commands::EngineSource;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Cross-domain concept fusion and Socratic dialogue", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Config file (default: .polymath/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Corpus file or directory, overriding the configured one
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter .polymath/config.toml
    Init {
        /// Corpus file or directory to record in the config
        #[arg(long = "with-corpus")]
        with_corpus: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Semantic search across domains
    Search {
        /// Natural language query
        query: String,

        /// Restrict to these domains (e.g. --domain biology --domain economics)
        #[arg(short, long = "domain")]
        domains: Vec<String>,

        /// Maximum results
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Find partner concepts from other domains
    Bridges {
        /// Concept id or name
        concept: String,

        /// Maximum results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Suggest fusions between two concepts
    Fuse {
        /// Source concept
        concept_a: String,

        /// Target concept
        concept_b: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the seven fusion patterns
    Patterns {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Estimate how novel an idea is
    Novelty {
        /// Idea to evaluate
        proposal: String,

        /// Neighbours to compare against
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Surface and challenge the premises of a statement
    Challenge {
        /// Statement to examine
        statement: String,

        /// Domain to draw no counter-perspective from
        #[arg(long)]
        exclude: Option<String>,
    },

    /// List the domain catalogue
    Domains {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Interactive Socratic dialogue
    Dialogue {
        /// Concept or topic to question
        focus: String,

        /// Starting mode (explore, challenge, viewpoints)
        #[arg(short, long, default_value = "explore")]
        mode: DialogueMode,

        /// Write the markdown transcript here when the session ends
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Plan a learning path from a concept
    Path {
        /// Concept id or name to start from
        start: String,

        /// Walk strategy (depth_first, breadth_first, spiral, bridge, challenge)
        #[arg(short = 't', long = "type", default_value = "spiral")]
        path_type: PathType,

        /// Goal concept for bridge paths
        #[arg(short, long)]
        goal: Option<String>,

        /// Step budget
        #[arg(short = 'n', long)]
        steps: Option<usize>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Serve tools over MCP (JSON-RPC on stdio)
    Serve,
}

fn init_logging(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("polymath=info"),
            _ => EnvFilter::new("polymath=debug"),
        }
    };
    // stdout carries MCP frames and command output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = EngineSource {
        config: cli.source.config,
        corpus: cli.source.corpus,
    };

    match cli.command {
        Commands::Init { with_corpus, force } => {
            let root = std::env::current_dir()?;
            commands::init::execute(&root, with_corpus, force)?;
        }
        Commands::Patterns { json } => {
            commands::patterns::execute(json)?;
        }
        Commands::Search {
            query,
            domains,
            limit,
            json,
        } => {
            let (engine, _) = source.open()?;
            commands::search::execute(&engine, &query, &domains, limit, json)?;
        }
        Commands::Bridges { concept, limit } => {
            let (engine, _) = source.open()?;
            commands::bridges::execute(&engine, &concept, limit)?;
        }
        Commands::Fuse {
            concept_a,
            concept_b,
            json,
        } => {
            let (engine, _) = source.open()?;
            commands::fuse::execute(&engine, &concept_a, &concept_b, json)?;
        }
        Commands::Novelty {
            proposal,
            limit,
            json,
        } => {
            let (engine, _) = source.open()?;
            commands::novelty::execute(&engine, &proposal, limit, json)?;
        }
        Commands::Challenge { statement, exclude } => {
            let (engine, _) = source.open()?;
            commands::challenge::execute(&engine, &statement, exclude.as_deref())?;
        }
        Commands::Domains { json } => {
            commands::domains::execute(json)?;
        }
        Commands::Dialogue {
            focus,
            mode,
            export,
        } => {
            let (engine, _) = source.open()?;
            commands::dialogue::execute(&engine, &focus, mode, export.as_deref())?;
        }
        Commands::Path {
            start,
            path_type,
            goal,
            steps,
            json,
        } => {
            let (engine, _) = source.open()?;
            commands::path::execute(&engine, &start, path_type, goal.as_deref(), steps, json)?;
        }
        Commands::Serve => {
            let (engine, config) = source.open()?;
            commands::serve::execute(engine, &config)?;
        }
    }

    Ok(())
}
