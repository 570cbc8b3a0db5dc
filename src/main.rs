use clap::{ArgAction, Args, Parser as ClapParser, Subcommand};
use rdd_translate::cli::{
    self, CheckOptions, CliError, DEFAULT_SUFFIX, FileOutcome, TranslateOptions,
};
use rdd_translate::{Layout, Translation, TranslatorConfig};
use serde_json::json;
use std::io::{self, Read};
use std::path::PathBuf;

mod logging;

#[derive(ClapParser)]
#[command(name = "rdd2df")]
#[command(
    about = "rdd2df - Translate sc.range(...).map(...).collect() pipelines into selectExpr chains"
)]
#[command(version)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReportArgs {
    /// Print the symbol table of each transformation
    #[arg(long)]
    symbols: bool,

    /// Print the translation and symbol tables as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct TargetArgs {
    /// Identifier that replaces `sc`
    #[arg(long, env = "RDD2DF_NAMESPACE", default_value = "spark")]
    namespace: String,

    /// Keep the chained calls on one line
    #[arg(long)]
    inline: bool,
}

impl TargetArgs {
    fn config(&self) -> TranslatorConfig {
        let layout = if self.inline {
            Layout::Inline
        } else {
            Layout::Stacked
        };
        TranslatorConfig::default()
            .with_namespace(self.namespace.clone())
            .with_layout(layout)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Translate pipeline files, writing <name><suffix>.scala next to each
    Translate {
        /// Input files; each is translated independently
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print translations instead of writing output files
        #[arg(long)]
        stdout: bool,

        /// Output file name suffix
        #[arg(long, env = "RDD2DF_SUFFIX", default_value = DEFAULT_SUFFIX)]
        suffix: String,

        #[command(flatten)]
        report: ReportArgs,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Translate a pipeline given inline or on stdin
    Check {
        /// Pipeline source (reads from stdin if not provided)
        source: Option<String>,

        #[command(flatten)]
        report: ReportArgs,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show the accepted grammar and how it translates
    Grammar,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Translate {
            files,
            stdout,
            suffix,
            report,
            target,
        } => {
            let options = TranslateOptions {
                config: target.config(),
                suffix,
                to_stdout: stdout,
            };
            run_translate(&files, &options, &report)
        }
        Commands::Check {
            source,
            report,
            target,
        } => run_check(source, target.config(), &report),
        Commands::Grammar => {
            print!("{}", cli::get_grammar_reference());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_translate(
    files: &[PathBuf],
    options: &TranslateOptions,
    report: &ReportArgs,
) -> Result<(), CliError> {
    let mut failed = 0;

    for file in files {
        match cli::translate_file(file, options) {
            Ok(outcome) => print_outcome(&outcome, options.to_stdout, report)?,
            Err(e) => {
                eprintln!("{}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Failed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

fn print_outcome(
    outcome: &FileOutcome,
    to_stdout: bool,
    report: &ReportArgs,
) -> Result<(), CliError> {
    if report.json {
        let mut value = outcome.translation.to_json();
        value["input"] = json!(outcome.input.display().to_string());
        value["written_to"] = json!(
            outcome
                .output
                .as_ref()
                .map(|path| path.display().to_string())
        );
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match &outcome.output {
        Some(path) => println!(
            "Parsing was successful: {} -> {}",
            outcome.input.display(),
            path.display()
        ),
        None => println!("Parsing was successful: {}", outcome.input.display()),
    }
    if to_stdout {
        println!("{}", outcome.translation);
    }
    if report.symbols {
        print!("{}", outcome.translation.symbol_report());
    }
    Ok(())
}

fn run_check(
    source: Option<String>,
    config: TranslatorConfig,
    report: &ReportArgs,
) -> Result<(), CliError> {
    let source = match source {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    let translation = cli::execute_check(&CheckOptions { source, config })?;
    print_translation(&translation, report)
}

fn print_translation(translation: &Translation, report: &ReportArgs) -> Result<(), CliError> {
    if report.json {
        println!("{}", serde_json::to_string_pretty(&translation.to_json())?);
        return Ok(());
    }

    println!("{}", translation);
    if report.symbols {
        print!("{}", translation.symbol_report());
    }
    Ok(())
}
