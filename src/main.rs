use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use plate_lang::cli::{self, CheckOptions, CheckResult, CliError, OutputFormat};
use plate_lang::{EngineOptions, ScanMode, TemplateEngine};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(ClapParser)]
#[command(name = "plate")]
#[command(about = "Plate - compile text templates with embedded expressions")]
#[command(version)]
struct Cli {
    /// Log compiler and cache activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Tree,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template (or a single expression) and print the result
    Check {
        /// Template source (reads from stdin if not provided)
        source: Option<String>,

        /// Treat the source as a single expression instead of a template
        #[arg(short, long)]
        expression: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't print the result
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the token stream of a source
    Tokens {
        /// Source to scan (reads from stdin if not provided)
        source: Option<String>,

        /// Start scanning in code mode instead of text mode
        #[arg(long)]
        code: bool,
    },

    /// Compile a template file through the engine cache
    Compile {
        /// Template name, without extension
        name: String,

        /// Template directory
        #[arg(short, long, default_value = "./")]
        dir: PathBuf,

        /// Don't read or write compiled files
        #[arg(long)]
        no_cache: bool,

        /// Pretty-print the compiled program
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'plate docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            source,
            expression,
            format,
            pretty,
            syntax_only,
        } => run_check(source, expression, format, pretty, syntax_only),
        Commands::Tokens { source, code } => run_tokens(source, code),
        Commands::Compile {
            name,
            dir,
            no_cache,
            pretty,
        } => run_compile(&name, dir, no_cache, pretty),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "plate_lang=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn read_source(source: Option<String>) -> Result<String, CliError> {
    match source {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_check(
    source: Option<String>,
    expression: bool,
    format: Format,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let options = CheckOptions {
        source: read_source(source)?,
        expression,
        format: match format {
            Format::Json => OutputFormat::Json,
            Format::Tree => OutputFormat::Tree,
        },
        pretty,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => println!("{}", output),
    }
    Ok(())
}

fn run_tokens(source: Option<String>, code: bool) -> Result<(), CliError> {
    let source = read_source(source)?;
    let mode = if code { ScanMode::Code } else { ScanMode::Text };

    let tokens = cli::list_tokens(&source, mode)?;
    if !tokens.is_empty() {
        println!("{}", cli::format_tokens(&tokens));
    }
    Ok(())
}

fn run_compile(name: &str, dir: PathBuf, no_cache: bool, pretty: bool) -> Result<(), CliError> {
    let options = EngineOptions::default()
        .with_template_dir(dir)
        .with_cache(!no_cache);
    let mut engine = TemplateEngine::new(options);

    let program = engine.compile(name)?;
    let json = plate_lang::program_to_json(&program)?;
    let text = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    }
    .map_err(plate_lang::ConvertError::from)?;

    println!("{}", text);
    Ok(())
}
