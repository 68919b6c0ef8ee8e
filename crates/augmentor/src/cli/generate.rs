//! The `augmentor generate` command: one source image in, one ZIP out.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use augmentor_core::{
    ArchivePackager, AugmentRequest, AugmentResponse, Augmentor, BatchCount, Config,
    TransformPreset,
};
use clap::{Args, ValueEnum};
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source JPEG or PNG image
    #[arg(required = true)]
    pub input: PathBuf,

    /// Number of variants to generate (1-50) [default: generation.default_count]
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Archive path [default: <output.dir>/<archive.file_name>]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed the random source for reproducible output
    #[arg(long, env = "AUGMENTOR_SEED")]
    pub seed: Option<u64>,

    /// Transform preset [default: generation.preset]
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Longest edge after normalization
    #[arg(long)]
    pub max_side: Option<u32>,

    /// Write preview_<i>.jpg files for the preview subset
    #[arg(long)]
    pub preview_dir: Option<PathBuf>,

    /// Write the JSON run report to a file instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip embedding preview thumbnails in the report
    #[arg(long)]
    pub no_thumbnails: bool,
}

/// Transform presets selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Preset {
    /// Rotation, flip, brightness and contrast
    Basic,
    /// Basic plus shift, shear and zoom
    Extended,
}

impl From<Preset> for TransformPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Basic => TransformPreset::Basic,
            Preset::Extended => TransformPreset::Extended,
        }
    }
}

/// Execute the generate command.
pub async fn execute(args: GenerateArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);

    let input = expand_path(&args.input);
    if !input.is_file() {
        anyhow::bail!(
            "Input file does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            input
        );
    }
    let source = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read {:?}", input))?;

    let count = BatchCount::new(args.count.unwrap_or(config.generation.default_count))?;
    let seed = args.seed.or(config.generation.seed);
    let rng = match seed {
        Some(seed) => {
            tracing::debug!("Using fixed seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    tracing::info!(
        "Generating {} variant(s) of {:?} ({} preset)",
        count.get(),
        input,
        config.generation.preset.as_str()
    );

    let augmentor = Augmentor::new(config.clone())?;
    let timeout = Duration::from_millis(config.limits.generate_timeout_ms);
    let progress = create_progress_bar(count.get() as u64);
    let request = AugmentRequest::new(source, count);

    let result = run_blocking(augmentor, request, rng, timeout, progress.clone()).await;
    progress.finish_and_clear();
    let response = result?;

    let archive_path = args
        .output
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| config.archive_path());
    write_file(&archive_path, &response.archive).await?;
    tracing::info!(
        "Wrote {} ({} bytes)",
        archive_path.display(),
        response.archive.len()
    );

    if let Some(dir) = &args.preview_dir {
        let written = write_previews(&expand_path(dir), &response, &config).await?;
        tracing::info!("Wrote {} preview image(s) to {:?}", written, dir);
    }

    let report = if config.output.pretty {
        serde_json::to_string_pretty(&response.report)?
    } else {
        serde_json::to_string(&response.report)?
    };
    match &args.report {
        Some(path) => write_file(&expand_path(path), report.as_bytes()).await?,
        None => println!("{}", report),
    }

    Ok(())
}

/// Fold CLI flags into the loaded config.
fn apply_overrides(config: &mut Config, args: &GenerateArgs) {
    if let Some(preset) = args.preset {
        config.generation.preset = preset.into();
        // An explicit preset on the command line beats a [generation.transform] table
        config.generation.transform = None;
    }
    if let Some(max_side) = args.max_side {
        config.generation.max_side = max_side;
    }
    if args.no_thumbnails {
        config.preview.enabled = false;
    }
}

/// Run the synchronous pipeline off the async runtime under a wall-clock budget.
async fn run_blocking(
    augmentor: Augmentor,
    request: AugmentRequest,
    mut rng: StdRng,
    timeout: Duration,
    progress: ProgressBar,
) -> anyhow::Result<AugmentResponse> {
    let gate = ProgressGate::new(progress);
    let reporter = gate.clone();

    let result = spawn_with_timeout(timeout, move || {
        augmentor.run_with_progress(request, &mut rng, |done, total| reporter.update(done, total))
    })
    .await;

    // After a timeout the task keeps running; its updates must not reach the bar.
    gate.close();
    let response = result??;
    Ok(response)
}

/// Run `job` on the blocking pool and stop waiting for it after `timeout`.
///
/// An overrunning job keeps its thread until it returns, so the runtime has
/// to be shut down with `shutdown_background` for the process to exit promptly.
async fn spawn_with_timeout<T, F>(timeout: Duration, job: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => anyhow::bail!("Generation task failed: {}", e),
        Err(_) => anyhow::bail!(
            "Generation timed out after {}ms (limits.generate_timeout_ms)",
            timeout.as_millis()
        ),
    }
}

/// Progress bar handle that drops updates once closed.
#[derive(Clone)]
struct ProgressGate {
    bar: ProgressBar,
    closed: Arc<AtomicBool>,
}

impl ProgressGate {
    fn new(bar: ProgressBar) -> Self {
        Self {
            bar,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn update(&self, done: usize, total: usize) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        self.bar.set_position(done as u64);
        self.bar.set_message(format!("augmented_{}.jpg", done.min(total)));
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Write `preview_<i>.jpg` for every image in the preview subset.
async fn write_previews(
    dir: &Path,
    response: &AugmentResponse,
    config: &Config,
) -> anyhow::Result<usize> {
    tokio::fs::create_dir_all(dir).await?;
    let packager = ArchivePackager::new(config.archive.clone());

    for augmented in &response.preview {
        let jpeg = packager.encode_jpeg(augmented.image(), augmented.index())?;
        let path = dir.join(format!("preview_{}.jpg", augmented.index()));
        tokio::fs::write(&path, jpeg)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;
    }

    Ok(response.preview.len())
}

/// Write bytes to `path`, creating parent directories as needed.
async fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {:?}", path))
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    use indicatif::ProgressStyle;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("decoding...");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::time::Instant;

    fn args(input: &str) -> GenerateArgs {
        GenerateArgs {
            input: PathBuf::from(input),
            count: None,
            output: None,
            seed: None,
            preset: None,
            max_side: None,
            preview_dir: None,
            report: None,
            no_thumbnails: false,
        }
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        });
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
        buffer.into_inner()
    }

    fn hidden_bar() -> ProgressBar {
        ProgressBar::hidden()
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let mut config = Config::default();
        config.generation.transform = Some(augmentor_core::TransformSpec::basic());

        let mut cli = args("in.jpg");
        cli.preset = Some(Preset::Extended);
        cli.max_side = Some(256);
        cli.no_thumbnails = true;
        apply_overrides(&mut config, &cli);

        assert_eq!(config.generation.preset, TransformPreset::Extended);
        assert!(config.generation.transform.is_none());
        assert_eq!(config.generation.max_side, 256);
        assert!(!config.preview.enabled);
    }

    #[test]
    fn test_no_overrides_leave_config_alone() {
        let mut config = Config::default();
        apply_overrides(&mut config, &args("in.jpg"));
        assert_eq!(config.generation.preset, TransformPreset::Basic);
        assert_eq!(config.generation.max_side, 512);
        assert!(config.preview.enabled);
    }

    #[test]
    fn test_expand_path_plain() {
        assert_eq!(expand_path(Path::new("a/b.zip")), PathBuf::from("a/b.zip"));
    }

    #[tokio::test]
    async fn test_run_blocking_returns_response() {
        let augmentor = Augmentor::new(Config::default()).unwrap();
        let request = AugmentRequest::new(jpeg_bytes(96, 64), BatchCount::new(3).unwrap());
        let response = run_blocking(
            augmentor,
            request,
            StdRng::seed_from_u64(8),
            Duration::from_secs(60),
            hidden_bar(),
        )
        .await
        .unwrap();
        assert_eq!(response.report.count, 3);
        assert_eq!((response.width, response.height), (96, 64));
    }

    #[tokio::test]
    async fn test_run_blocking_surfaces_pipeline_errors() {
        let augmentor = Augmentor::new(Config::default()).unwrap();
        let request = AugmentRequest::new(b"nope".to_vec(), BatchCount::new(1).unwrap());
        let err = run_blocking(
            augmentor,
            request,
            StdRng::seed_from_u64(8),
            Duration::from_secs(60),
            hidden_bar(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Decode error"));
    }

    #[test]
    fn test_run_blocking_times_out_and_freezes_progress() {
        let runtime = crate::build_runtime().unwrap();
        let augmentor = Augmentor::new(Config::default()).unwrap();
        let request = AugmentRequest::new(jpeg_bytes(1024, 768), BatchCount::new(50).unwrap())
            .with_spec(TransformPreset::Extended.spec());
        let bar = hidden_bar();

        let start = Instant::now();
        let err = runtime
            .block_on(run_blocking(
                augmentor,
                request,
                StdRng::seed_from_u64(8),
                Duration::from_millis(10),
                bar.clone(),
            ))
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));

        // The abandoned task is still generating; the bar must not move.
        std::thread::sleep(Duration::from_millis(50));
        let frozen = bar.position();
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(bar.position(), frozen);

        runtime.shutdown_background();
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timed_out_job_does_not_delay_runtime_shutdown() {
        let runtime = crate::build_runtime().unwrap();
        let start = Instant::now();

        let result = runtime.block_on(spawn_with_timeout(Duration::from_millis(10), || {
            std::thread::sleep(Duration::from_secs(5));
        }));
        runtime.shutdown_background();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("timed out after 10ms"));
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "runtime shutdown took {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn test_closed_progress_gate_ignores_updates() {
        let bar = hidden_bar();
        let gate = ProgressGate::new(bar.clone());
        gate.update(3, 10);
        assert_eq!(bar.position(), 3);

        gate.close();
        gate.clone().update(7, 10);
        assert_eq!(bar.position(), 3);
    }

    #[tokio::test]
    async fn test_write_previews_and_archive() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let augmentor = Augmentor::new(config.clone()).unwrap();
        let request = AugmentRequest::new(jpeg_bytes(64, 64), BatchCount::new(10).unwrap());
        let response = run_blocking(
            augmentor,
            request,
            StdRng::seed_from_u64(1),
            Duration::from_secs(60),
            hidden_bar(),
        )
        .await
        .unwrap();

        let written = write_previews(&dir.path().join("previews"), &response, &config)
            .await
            .unwrap();
        assert_eq!(written, 8);
        assert!(dir.path().join("previews/preview_8.jpg").exists());
        assert!(!dir.path().join("previews/preview_9.jpg").exists());

        let archive = dir.path().join("out/augmented_images.zip");
        write_file(&archive, &response.archive).await.unwrap();
        assert_eq!(std::fs::read(&archive).unwrap(), response.archive);
    }
}
