//! token_prep - Source preparation CLI
//!
//! Filters, anonymizes and tokenizes TypeScript files for language-model
//! training corpora.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use token_prep::{
    config::{Config, OutputFormat},
    reporter::{create_reporter, TextReporter, Reporter},
    Dialect, Preprocessor,
};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Normalize and tokenize source files for next-token models
#[derive(Parser)]
#[command(name = "token_prep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Output format
    #[arg(short = 'f', long)]
    format: Option<OutputFormatArg>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dialect for files whose extension does not name one
    #[arg(long)]
    dialect: Option<DialectArg>,

    /// Keep `import` lines
    #[arg(long)]
    keep_imports: bool,

    /// Keep `//` comments
    #[arg(long)]
    keep_comments: bool,

    /// Skip the class-scope pass
    #[arg(long)]
    no_class_scope: bool,

    /// Skip the function/method-scope pass
    #[arg(long)]
    no_function_scope: bool,

    /// Worker threads for batches (0 = one per CPU)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum DialectArg {
    Typescript,
    Tsx,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Typescript => Dialect::TypeScript,
            DialectArg::Tsx => Dialect::Tsx,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print tokens
    Tokenize {
        /// Source files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Filter and anonymize a file, printing the rewritten source
    Anonymize {
        /// Source file
        file: PathBuf,
    },

    /// Strip comments and imports from a file
    Filter {
        /// Source file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 if cli.quiet => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level.to_string())),
        )
        .init();

    // Load configuration
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("loading config {}", config_path.display()))?
    } else {
        Config::default()
    };

    // Override with CLI options
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }
    if cli.output.is_some() {
        config.output.output_path = cli.output.clone();
    }
    if let Some(dialect) = cli.dialect {
        config.anonymizer.dialect = dialect.into();
    }
    if let Some(threads) = cli.threads {
        config.concurrency.threads = threads;
    }
    if cli.keep_imports {
        config.filter.strip_imports = false;
    }
    if cli.keep_comments {
        config.filter.strip_comments = false;
    }
    if cli.no_class_scope {
        config.anonymizer.class_scope = false;
    }
    if cli.no_function_scope {
        config.anonymizer.function_scope = false;
    }

    let preprocessor = Preprocessor::new(config.clone())?;

    let mut failed = false;
    let report = match cli.command {
        Commands::Tokenize { files } => {
            let outcomes = preprocessor.process_files(&files);
            failed = outcomes.iter().any(|o| !o.is_processed());

            let reporter: Box<dyn Reporter> =
                if files.len() == 1 && config.output.format == OutputFormat::Text {
                    Box::new(TextReporter::new().without_headers())
                } else {
                    create_reporter(config.output.format)
                };
            reporter.generate(&outcomes)
        }

        Commands::Anonymize { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let dialect = Dialect::from_path(&file).unwrap_or(config.anonymizer.dialect);
            let mut text = preprocessor.anonymize_text(&content, dialect)?;
            text.push('\n');
            text
        }

        Commands::Filter { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut text = preprocessor.filter_text(&content);
            text.push('\n');
            text
        }
    };

    if let Some(ref output_path) = config.output.output_path {
        std::fs::write(output_path, &report)?;
        info!("Output written to: {}", output_path.display());
    } else {
        print!("{}", report);
    }

    if failed {
        error!("One or more files could not be processed");
        std::process::exit(1);
    }

    Ok(())
}
