//! hanlyric CLI - Chinese lyrics romanization tool
//!
//! A command-line tool for turning raw Chinese lyrics into Pinyin or Jyutping
//! study transcripts.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use hanlyric::{Language, Pipeline, PipelineOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Chinese song lyrics to Pinyin/Jyutping transcripts
#[derive(Parser)]
#[command(
    name = "hanlyric",
    version,
    about = "Romanize Chinese song lyrics",
    long_about = "hanlyric - Chinese lyrics to study transcripts.\n\n\
                  Cleans raw lyrics, converts Traditional characters to Simplified and\n\
                  pairs every line with Hanyu Pinyin or Jyutping.\n\n\
                  Usage:\n  \
                  hanlyric <file>                  Romanize a file (Mandarin)\n  \
                  hanlyric romanize -l cantonese   Romanize stdin as Jyutping\n  \
                  hanlyric fetch \"月亮代表我的心\"     Look up a song and romanize it"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (for default romanization)
    #[arg(global = false)]
    input: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Romanize lyrics from a file or stdin
    #[command(visible_alias = "r")]
    Romanize {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Only clean the lyrics (drop markers, credits and blank runs)
    Clean {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Keep [Section] marker lines
        #[arg(long)]
        keep_markers: bool,
    },

    /// Only convert Traditional characters to Simplified
    Simplify {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,
    },

    /// Romanize many files in parallel
    Batch {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (default: next to each input)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Look up a song on Genius and romanize its lyrics
    #[cfg(feature = "genius")]
    Fetch {
        /// Song title, optionally with artist
        query: String,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output JSON with source information
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Romanization language
#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    /// Hanyu Pinyin with tone marks
    Mandarin,
    /// Jyutping with tone numbers
    Cantonese,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Mandarin => Language::Mandarin,
            LanguageArg::Cantonese => Language::Cantonese,
        }
    }
}

#[derive(clap::Args)]
struct PipelineArgs {
    /// Romanization language
    #[arg(short, long, default_value = "mandarin")]
    language: LanguageArg,

    /// Keep Traditional characters
    #[arg(long)]
    no_simplify: bool,

    /// Disable 一/不 tone sandhi (Mandarin)
    #[arg(long)]
    no_sandhi: bool,

    /// Extra Jyutping table, <char>TAB<jyutping> per line (Cantonese)
    #[arg(long)]
    dict: Option<PathBuf>,
}

impl PipelineArgs {
    fn options(&self) -> PipelineOptions {
        let mut options = PipelineOptions::new().with_language(self.language.into());
        if self.no_simplify {
            options = options.without_simplify();
        }
        if self.no_sandhi {
            options = options.without_tone_sandhi();
        }
        if let Some(ref dict) = self.dict {
            options = options.with_jyutping_dictionary(dict);
        }
        options
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Handle default command (hanlyric <file>)
    let Some(command) = cli.command else {
        if let Some(input) = cli.input {
            let pipeline = build_pipeline(&PipelineOptions::default())?;
            let raw = read_input(Some(&input))?;
            write_output(None, &pipeline.process(&raw))?;
        } else {
            // No input provided, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
        return Ok(());
    };

    match command {
        Commands::Romanize {
            input,
            output,
            pipeline,
            json,
        } => {
            let raw = read_input(input.as_ref())?;
            let pipeline = build_pipeline(&pipeline.options())?;
            let transcript = pipeline.transcribe(&raw);

            let content = if json {
                serde_json::to_string_pretty(&transcript)?
            } else {
                transcript.into_string()
            };
            warn_if_empty(&content);
            write_output(output.as_ref(), &content)?;

            if let Some(path) = output {
                println!(
                    "{} Romanized ({}): {}",
                    "✓".green().bold(),
                    pipeline.language().romanization_name(),
                    path.display()
                );
            }
        }

        Commands::Clean {
            input,
            keep_markers,
        } => {
            let raw = read_input(input.as_ref())?;
            let mut options = hanlyric::CleanOptions::default();
            if keep_markers {
                options = options.keep_section_markers();
            }
            write_output(None, &hanlyric::clean_with_options(&raw, &options))?;
        }

        Commands::Simplify { input } => {
            let raw = read_input(input.as_ref())?;
            let converter = hanlyric::OpenccConverter::new()?;
            write_output(None, &hanlyric::normalize(&raw, &converter))?;
        }

        Commands::Batch {
            inputs,
            output_dir,
            pipeline,
        } => {
            run_batch(&inputs, output_dir.as_deref(), &pipeline.options())?;
        }

        #[cfg(feature = "genius")]
        Commands::Fetch {
            query,
            pipeline,
            json,
        } => {
            let pipeline = build_pipeline(&pipeline.options())?;
            let source = hanlyric::GeniusSource::new()?;

            let pb = create_spinner("Searching Genius...");
            tracing::info!(query = %query, language = %pipeline.language(), "fetch start");
            let result = hanlyric::fetch_and_process(&pipeline, &source, &query);
            pb.finish_and_clear();

            let response = match result {
                Ok(response) => response,
                Err(hanlyric::Error::SourceUnavailable(reason)) => {
                    tracing::warn!(query = %query, %reason, "lyrics unavailable");
                    eprintln!(
                        "{} Could not retrieve lyrics for {}: {}",
                        "✗".red().bold(),
                        query.bold(),
                        reason
                    );
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            };

            tracing::info!(source = %response.source, method = response.method, "fetch done");
            if json {
                write_output(None, &serde_json::to_string_pretty(&response)?)?;
            } else {
                eprintln!("{}: {}", "Source".bold(), response.source);
                warn_if_empty(&response.lyrics);
                write_output(None, &response.lyrics)?;
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Romanize every input file in parallel, writing `<stem>.romanized.txt`.
fn run_batch(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    options: &PipelineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(options)?;

    let pb = create_spinner("Reading files...");
    let raws = inputs
        .iter()
        .map(|path| read_input(Some(path)))
        .collect::<Result<Vec<_>, _>>()?;

    pb.set_message(format!("Romanizing {} files...", raws.len()));
    tracing::info!(files = raws.len(), language = %pipeline.language(), "batch start");
    let results = pipeline.process_batch(&raws);

    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    let mut written = Vec::with_capacity(inputs.len());
    for (input, transcript) in inputs.iter().zip(&results) {
        let stem = input
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let dir = match output_dir {
            Some(dir) => dir,
            None => input.parent().unwrap_or(Path::new(".")),
        };
        let path = dir.join(format!("{}.romanized.txt", stem));
        fs::write(&path, transcript)?;
        tracing::debug!(input = %input.display(), output = %path.display(), "wrote transcript");
        written.push((path, transcript.is_empty()));
    }

    pb.finish_and_clear();

    println!("{}", "Batch Complete".green().bold());
    println!("{}", "─".repeat(40));
    for (path, empty) in &written {
        if *empty {
            println!("  {} {} (no lyrics)", "!".yellow().bold(), path.display());
        } else {
            println!("  {} {}", "✓".green(), path.display());
        }
    }

    Ok(())
}

fn build_pipeline(options: &PipelineOptions) -> hanlyric::Result<Pipeline> {
    let pb = create_spinner("Loading dictionaries...");
    let pipeline = Pipeline::new(options);
    pb.finish_and_clear();
    pipeline
}

fn warn_if_empty(content: &str) {
    if content.trim().is_empty() {
        eprintln!("{} No lyrics left after cleaning", "!".yellow().bold());
    }
}

fn print_version() {
    println!("{} {}", "hanlyric".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Chinese lyrics to Pinyin/Jyutping study transcripts");
    println!();
    println!("Romanizations: Hanyu Pinyin (Mandarin), Jyutping (Cantonese)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pipeline_args_to_options() {
        let cli = Cli::try_parse_from([
            "hanlyric",
            "romanize",
            "song.txt",
            "-l",
            "cantonese",
            "--no-simplify",
            "--dict",
            "extra.tsv",
        ])
        .unwrap();
        let Some(Commands::Romanize { pipeline, .. }) = cli.command else {
            panic!("expected romanize");
        };
        let options = pipeline.options();
        assert_eq!(options.language, Language::Cantonese);
        assert!(!options.simplify);
        assert!(options.tone_sandhi);
        assert_eq!(options.jyutping_dictionary, Some(PathBuf::from("extra.tsv")));
    }

    #[test]
    fn test_default_language_is_mandarin() {
        let cli = Cli::try_parse_from(["hanlyric", "batch", "a.txt"]).unwrap();
        let Some(Commands::Batch { pipeline, .. }) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(pipeline.options().language, Language::Mandarin);
    }
}
