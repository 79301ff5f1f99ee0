use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use frameinfo::{
    ExtractOptions, ExtractPaths, FrameMetadata, FrameMetadataExtractor, FrameProbe, GifOptions,
    OperationType, ProgressCallback, ProgressInfo,
};

const CLI_AFTER_HELP: &str = "Examples:\n  frameinfo convert assets/run.gif\n  frameinfo convert assets/run.webp --out run.gif --json run.json --progress\n  frameinfo probe assets/run.gif --json\n  frameinfo validate assets/run.gif\n  frameinfo completions zsh > _frameinfo";

#[derive(Debug, Parser)]
#[command(
    name = "frameinfo",
    version,
    about = "Read frame timing from animated images and re-save them as GIF with a JSON sidecar",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while scanning and encoding.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Re-save an image as GIF and write its frame metadata as JSON.
    #[command(
        about = "Convert to GIF and write frame metadata",
        after_help = "Examples:\n  frameinfo convert assets/run.gif\n  frameinfo convert assets/run.png --out-dir out --default-delay 80"
    )]
    Convert {
        /// Input image path.
        input: PathBuf,
        /// Output GIF path (default: <stem>.gif in --out-dir).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output JSON path (default: <stem>.json in --out-dir).
        #[arg(long)]
        json: Option<PathBuf>,
        /// Directory for derived output paths.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Duration in milliseconds for frames that carry none.
        #[arg(long, default_value_t = 100)]
        default_delay: u64,
        /// Loop count for the output GIF (default: loop forever).
        #[arg(long)]
        repeat: Option<u16>,
        /// Quantiser speed, 1 (best) to 30 (fastest).
        #[arg(long, default_value_t = 10)]
        speed: i32,
    },

    /// Print frame metadata without writing any files.
    #[command(
        about = "Print frame metadata",
        visible_alias = "info",
        after_help = "Examples:\n  frameinfo probe run.gif\n  frameinfo probe run.gif --json"
    )]
    Probe {
        /// Input image path.
        input: PathBuf,
        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
        /// Duration in milliseconds for frames that carry none.
        #[arg(long, default_value_t = 100)]
        default_delay: u64,
    },

    /// Check frame metadata for issues GIF cannot represent.
    #[command(about = "Validate an image for GIF conversion")]
    Validate {
        /// Input image path.
        input: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn resolve_paths(
    input: PathBuf,
    out: Option<PathBuf>,
    json: Option<PathBuf>,
    out_dir: &Path,
) -> ExtractPaths {
    let derived = ExtractPaths::derived(&input, out_dir);
    ExtractPaths {
        input,
        output_image: out.unwrap_or(derived.output_image),
        output_json: json.unwrap_or(derived.output_json),
    }
}

/// Drives an indicatif bar from extractor progress events.
struct TerminalProgress {
    bar: ProgressBar,
    operation: Mutex<Option<OperationType>>,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new_spinner();
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        bar.enable_steady_tick(Duration::from_millis(100));
        Ok(Self {
            bar,
            operation: Mutex::new(None),
        })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Ok(mut current) = self.operation.lock()
            && *current != Some(info.operation)
        {
            *current = Some(info.operation);
            let message = match info.operation {
                OperationType::FrameScan => "scanning",
                OperationType::GifExport => "encoding",
                _ => "working",
            };
            self.bar.set_message(message);
            self.bar.reset();
        }
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn print_metadata(metadata: &FrameMetadata) {
    println!("Format: {}", metadata.original_format);
    println!("Size: {}x{}", metadata.width(), metadata.height());
    println!("Frames: {}", metadata.n_frames);
    println!("Average fps: {:.2}", metadata.average_fps);
    if let Some(stats) = metadata.timing_statistics() {
        println!(
            "Duration: {:.3}s per loop ({}–{} ms per frame)",
            stats.total_duration.as_secs_f64(),
            stats.min_duration_ms,
            stats.max_duration_ms,
        );
    }
    if !metadata.defaulted_frames.is_empty() {
        println!(
            "{} {} frame(s) without stored duration",
            "note:".cyan().bold(),
            metadata.defaulted_frames.len(),
        );
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match cli.command {
        Commands::Convert {
            input,
            out,
            json,
            out_dir,
            default_delay,
            repeat,
            speed,
        } => {
            let paths = resolve_paths(input, out, json, &out_dir);
            ensure_writable_path(&paths.output_image, cli.global.overwrite)?;
            ensure_writable_path(&paths.output_json, cli.global.overwrite)?;

            let mut options = ExtractOptions::new()
                .with_default_frame_duration(Duration::from_millis(default_delay))
                .with_gif_options(GifOptions::new().repeat(repeat).speed(speed));

            let progress = if cli.global.progress {
                let progress = Arc::new(TerminalProgress::new()?);
                options = options.with_progress(progress.clone());
                Some(progress)
            } else {
                None
            };

            let result = FrameMetadataExtractor::new(options).extract(&paths);
            if let Some(progress) = progress {
                progress.finish();
            }
            let metadata = result?;

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("GIF saved to {}", paths.output_image.display()).green()
            );
            println!("Total frames: {}", metadata.n_frames);
            println!("Average fps: {} fps", metadata.average_fps);
            println!("Metadata saved to {}", paths.output_json.display());
        }
        Commands::Probe {
            input,
            json,
            default_delay,
        } => {
            let options = ExtractOptions::new()
                .with_default_frame_duration(Duration::from_millis(default_delay));
            let metadata = FrameProbe::probe_with_options(&input, &options)?;
            if json {
                println!("{}", metadata.to_json_string()?);
            } else {
                print_metadata(&metadata);
            }
        }
        Commands::Validate { input } => {
            let metadata = FrameProbe::probe(&input)?;
            let report = frameinfo::validate(&metadata);
            print!("{report}");
            if !report.is_valid() {
                return Err(format!("{} failed validation", input.display()).into());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "frameinfo", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
