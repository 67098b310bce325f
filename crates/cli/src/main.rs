use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use facesort_core::classify::classifier::NearestNeighborClassifier;
use facesort_core::extraction::infrastructure::onnx_face_extractor::{
    OnnxFaceExtractor, DEFAULT_CONFIDENCE,
};
use facesort_core::io::infrastructure::image_file_reader::ImageFileReader;
use facesort_core::registry::registry_builder::RegistryBuilder;
use facesort_core::shared::constants::{
    DEFAULT_RESIZE_MAX, DEFAULT_THRESHOLD, DETECTOR_MODEL_NAME, DETECTOR_MODEL_URL,
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, FAILURE_LOG_NAME, INPUT_DIR_NAME, OUTPUT_DIR_NAME,
    REFERENCE_DIR_NAME,
};
use facesort_core::shared::model_resolver;
use facesort_core::sorting::failure_log;
use facesort_core::sorting::infrastructure::sequential_sort_executor::SequentialSortExecutor;
use facesort_core::sorting::infrastructure::threaded_sort_executor::ThreadedSortExecutor;
use facesort_core::sorting::sort_executor::{ProbeWorker, SortContext, SortExecutor};
use facesort_core::sorting::sort_images_use_case::SortImagesUseCase;
use facesort_core::sorting::sort_logger::StdoutSortLogger;

/// Sort photos into per-person folders by face recognition.
#[derive(Parser)]
#[command(name = "facesort")]
struct Cli {
    /// Base directory holding reference_faces/ and input_images/.
    #[arg(long, default_value = "face_sorter")]
    base_dir: PathBuf,

    /// Match threshold: a probe matches only when its nearest reference
    /// embedding is strictly closer than this distance.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Shrink input images so neither side exceeds this before detection
    /// (0 disables resizing). Reference images are never resized.
    #[arg(long, default_value_t = DEFAULT_RESIZE_MAX)]
    resize_max: u32,

    /// Worker threads for input processing.
    #[arg(long, default_value = "1")]
    jobs: usize,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Directory with pre-downloaded ONNX models (checked before the cache).
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector_path = resolve_model(&cli, DETECTOR_MODEL_NAME, DETECTOR_MODEL_URL)?;
    let embedder_path = resolve_model(&cli, EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL)?;

    let reference_dir = cli.base_dir.join(REFERENCE_DIR_NAME);
    let input_dir = cli.base_dir.join(INPUT_DIR_NAME);
    let output_root = cli.base_dir.join(OUTPUT_DIR_NAME);

    let mut builder = RegistryBuilder::new(
        Box::new(ImageFileReader),
        Box::new(OnnxFaceExtractor::new(
            &detector_path,
            &embedder_path,
            cli.confidence,
        )?),
    );
    let registry = builder.build(&reference_dir)?;
    log::info!("registered {} person(s)", registry.len());

    let ctx = SortContext {
        registry: Arc::new(registry),
        classifier: NearestNeighborClassifier::new(cli.threshold),
        output_root,
        resize_max: (cli.resize_max > 0).then_some(cli.resize_max),
        cancelled: Arc::new(AtomicBool::new(false)),
    };

    let workers = (0..cli.jobs)
        .map(|_| {
            Ok(ProbeWorker {
                reader: Box::new(ImageFileReader),
                extractor: Box::new(OnnxFaceExtractor::new(
                    &detector_path,
                    &embedder_path,
                    cli.confidence,
                )?),
            })
        })
        .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

    let executor: Box<dyn SortExecutor> = if cli.jobs > 1 {
        Box::new(ThreadedSortExecutor::new())
    } else {
        Box::new(SequentialSortExecutor)
    };

    let mut use_case = SortImagesUseCase::new(executor, Box::new(StdoutSortLogger));
    let (report, failures) = use_case.execute(workers, &ctx, &input_dir)?;

    let log_path = cli.base_dir.join(FAILURE_LOG_NAME);
    failure_log::write(&log_path, &failures)?;
    if !failures.is_empty() {
        eprintln!("{} failure(s) recorded in {}", failures.len(), log_path.display());
    }

    println!("{}", report.summary_string());
    Ok(())
}

fn resolve_model(cli: &Cli, name: &str, url: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let downloaded = Arc::new(AtomicBool::new(false));
    let progress_seen = downloaded.clone();
    let path = model_resolver::resolve(
        name,
        url,
        cli.models_dir.as_deref(),
        Some(Box::new(move |current, total| {
            progress_seen.store(true, Ordering::Relaxed);
            download_progress(current, total);
        })),
    )?;
    // The progress line has no trailing newline; close it only if one was
    // printed (cached and bundled models resolve without downloading).
    if downloaded.load(Ordering::Relaxed) {
        eprintln!();
    }
    Ok(path)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.base_dir.exists() {
        return Err(format!("Base directory not found: {}", cli.base_dir.display()).into());
    }
    if !(cli.threshold.is_finite() && cli.threshold > 0.0) {
        return Err(format!(
            "Threshold must be a positive number, got {}",
            cli.threshold
        )
        .into());
    }
    if cli.jobs == 0 {
        return Err("Jobs must be at least 1".into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
