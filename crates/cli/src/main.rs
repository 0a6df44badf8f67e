use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::style;
use deckshred_annotator::{
    annotate_deck, HeuristicAnnotator, HttpInferenceClient, ServiceAnnotator, ServiceConfig,
    SlideAnnotator,
};
use deckshred_chunker::ChunkingStrategy;
use deckshred_formatter::{FormatOptions, MarkdownFormatter};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;

use crate::config::FileConfig;
use crate::flags::StrategyFlag;

mod config;
mod flags;
mod input;

/// Transform slide-deck extractions into LLM-optimized markdown.
///
/// Deck files are JSON produced by the extraction collaborator, one
/// object per slide. Drop them in the input directory (or name them
/// directly) and pick up chunked markdown from the output directory.
#[derive(Parser)]
#[command(name = "deckshred")]
#[command(about = "Chunk slide decks into LLM-optimized markdown", long_about = None)]
#[command(version)]
struct Cli {
    /// Deck files to process; the input directory is scanned when empty
    files: Vec<PathBuf>,

    /// Input directory to scan for deck files
    #[arg(short = 'i', long, default_value = "input")]
    input_dir: PathBuf,

    /// Output directory for generated markdown files
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Chunking strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyFlag>,

    /// Token budget per chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Configuration file path (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Annotation service endpoint; heuristics only when unset
    #[arg(long)]
    annotate_url: Option<String>,

    /// Per-call timeout for the annotation service, in seconds
    #[arg(long)]
    annotate_timeout_secs: Option<u64>,

    /// Show what would be processed without processing it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

/// Effective settings after layering flags over the config file.
#[derive(Debug, Clone)]
struct Settings {
    strategy: ChunkingStrategy,
    chunk_size: usize,
    output_dir: PathBuf,
    annotate_url: Option<String>,
    annotate_timeout: Duration,
}

impl Settings {
    fn resolve(cli: &Cli) -> Result<Self> {
        let file = FileConfig::load(cli.config.as_deref())?;

        let strategy = match (cli.strategy, file.strategy.as_deref()) {
            (Some(flag), _) => flag.as_domain(),
            (None, Some(name)) => StrategyFlag::from_name(name)
                .with_context(|| format!("unknown strategy {name:?} in config"))?
                .as_domain(),
            (None, None) => ChunkingStrategy::Instructional,
        };

        let chunk_size = cli.chunk_size.unwrap_or(file.chunk_size);
        if chunk_size == 0 {
            bail!("chunk size must be greater than zero");
        }

        Ok(Self {
            strategy,
            chunk_size,
            output_dir: cli
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(file.output_dir)),
            annotate_url: cli.annotate_url.clone().or(file.annotate_url),
            annotate_timeout: Duration::from_secs(
                cli.annotate_timeout_secs.unwrap_or(file.annotate_timeout_secs),
            ),
        })
    }
}

/// Per-deck processing outcome.
struct DeckReport {
    file_name: String,
    slides: usize,
    documents: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let settings = Settings::resolve(&cli)?;
    let files = input::discover_files(&cli.files, &cli.input_dir)?;

    if files.is_empty() {
        println!(
            "{} No deck files found. Drop .json deck files in {}/ or name them directly.",
            style("!").yellow().bold(),
            cli.input_dir.display()
        );
        return Ok(());
    }

    show_plan(&files, &settings, cli.dry_run);
    if cli.dry_run {
        println!("{} Dry run complete - no files were processed.", style("i").cyan());
        return Ok(());
    }

    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;

    let annotator = build_annotator(&settings)?;
    let settings = Arc::new(settings);
    let started = Instant::now();

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    // One task per deck; decks share nothing mutable, so failures stay
    // contained to their own file.
    let mut tasks = JoinSet::new();
    for path in files {
        let settings = Arc::clone(&settings);
        let annotator = Arc::clone(&annotator);
        tasks.spawn(async move { process_deck(&path, &settings, annotator.as_ref()).await });
    }

    let mut total_slides = 0usize;
    let mut total_documents = 0usize;
    let mut processed = 0usize;
    let mut failures = 0usize;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(report)) => {
                progress.println(format!(
                    "{} {} -> {} document(s)",
                    style("ok").green(),
                    report.file_name,
                    report.documents
                ));
                total_slides += report.slides;
                total_documents += report.documents;
                processed += 1;
            }
            Ok(Err(err)) => {
                failures += 1;
                log::error!("{err:#}");
            }
            Err(join_err) => {
                failures += 1;
                log::error!("worker task failed: {join_err}");
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!();
    println!("{}", style("Processing complete").green().bold());
    println!("  Files processed: {processed}");
    if failures > 0 {
        println!("  Files failed:    {}", style(failures).red());
    }
    println!("  Slides:          {total_slides}");
    println!("  Documents:       {total_documents}");
    println!("  Elapsed:         {:.1}s", started.elapsed().as_secs_f64());
    println!("  Output:          {}/", settings.output_dir.display());

    Ok(())
}

fn build_annotator(settings: &Settings) -> Result<Arc<dyn SlideAnnotator>> {
    match &settings.annotate_url {
        Some(url) => {
            let service_config =
                ServiceConfig::new(url.clone()).with_timeout(settings.annotate_timeout);
            let client = HttpInferenceClient::new(service_config)
                .context("failed to build annotation client")?;
            log::info!("assisted annotation enabled via {url}");
            Ok(Arc::new(ServiceAnnotator::new(client)))
        }
        None => Ok(Arc::new(HeuristicAnnotator::new())),
    }
}

fn show_plan(files: &[PathBuf], settings: &Settings, dry_run: bool) {
    println!("{}", style("Processing plan").magenta().bold());
    for path in files {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let status = if dry_run { "preview" } else { "ready" };
        println!(
            "  {:<40} {:>8.1} KB  {}",
            path.file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into()),
            size as f64 / 1024.0,
            status
        );
    }
    println!(
        "  strategy={} chunk-size={} output={}/",
        settings.strategy.as_str(),
        settings.chunk_size,
        settings.output_dir.display()
    );
    println!();
}

/// Load, annotate, chunk, render, and write one deck.
///
/// Any error here fails this deck only; the caller keeps processing the
/// remaining files.
async fn process_deck(
    path: &Path,
    settings: &Settings,
    annotator: &dyn SlideAnnotator,
) -> Result<DeckReport> {
    let deck = input::load_deck(path)?;
    let presentation_name = deck.presentation.clone().unwrap_or_else(|| {
        path.file_stem()
            .map_or_else(|| "deck".to_string(), |s| s.to_string_lossy().into_owned())
    });

    let slides = annotate_deck(annotator, &deck.slides).await;
    let slide_count = slides.len();
    log::debug!("{presentation_name}: annotated {slide_count} slides");

    let formatter = MarkdownFormatter::new(FormatOptions {
        strategy: settings.strategy,
        chunk_size: settings.chunk_size,
        ..Default::default()
    });
    let documents = formatter
        .format(slides, &presentation_name)
        .with_context(|| format!("failed to format {presentation_name}"))?;

    for (filename, content) in &documents {
        let target = settings.output_dir.join(filename);
        std::fs::write(&target, content)
            .with_context(|| format!("failed to write {}", target.display()))?;
    }

    Ok(DeckReport {
        file_name: path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into()),
        slides: slide_count,
        documents: documents.len(),
    })
}
