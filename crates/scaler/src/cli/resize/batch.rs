//! Batch resize: read inputs, drive the progress bar, save downloads.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use scaler_core::{
    ArtifactRecord, BatchOutcome, Config, DiscoveredFile, Download, InputImage, ManifestWriter,
    PackagingError, ResizedArtifact, Scaler,
};

use super::setup::{manifest_format, SaveMode};
use super::ResizeArgs;

/// Resize every discovered file and save the results under the output dir.
pub async fn run_batch(
    config: Config,
    args: &ResizeArgs,
    mode: SaveMode,
    files: Vec<DiscoveredFile>,
) -> anyhow::Result<()> {
    let scaler = Scaler::new(config)?;
    let out_dir = scaler.config().output_dir();
    let start = Instant::now();

    let (inputs, unreadable) = read_inputs(&files).await;

    let progress = create_progress_bar();
    let observer = |percent: f64| progress.set_position(percent.round() as u64);
    let outcome = scaler.process(inputs, &observer).await;
    progress.finish_with_message(format!(
        "{} resized, {} failed",
        outcome.succeeded(),
        outcome.failed() + unreadable
    ));

    if outcome.is_empty() {
        anyhow::bail!(
            "Nothing to download: all {} image(s) failed to resize",
            files.len()
        );
    }

    let downloads = package(&scaler, &outcome, mode).await;
    std::fs::create_dir_all(&out_dir)?;
    let mut written_bytes = 0u64;
    for download in &downloads {
        let path = write_download(&out_dir, download)?;
        written_bytes += download.data.len() as u64;
        println!("{}", path.display());
    }

    if let Some(ref manifest_path) = args.manifest {
        let records: Vec<ArtifactRecord> =
            outcome.artifacts.iter().map(|a| scaler.record(a)).collect();
        let file = File::create(manifest_path)?;
        let mut writer = ManifestWriter::new(
            BufWriter::new(file),
            manifest_format(scaler.config(), args.format),
            scaler.config().output.pretty,
        );
        writer.write_manifest(&records)?;
        tracing::info!("Manifest written to {:?}", manifest_path);
    }

    outcome.release_all();

    print_summary(
        outcome.succeeded(),
        outcome.failed() + unreadable,
        downloads.len(),
        written_bytes,
        start.elapsed(),
    );
    Ok(())
}

/// Load discovered files. Unreadable files are logged and counted.
async fn read_inputs(files: &[DiscoveredFile]) -> (Vec<InputImage>, usize) {
    let mut inputs = Vec::with_capacity(files.len());
    let mut unreadable = 0;
    for file in files {
        match InputImage::from_path(&file.path).await {
            Ok(input) => inputs.push(input),
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", file.path, e);
                unreadable += 1;
            }
        }
    }
    (inputs, unreadable)
}

/// Build the downloads for `mode`. A failed archive falls back to
/// individual files so the resized images are never lost.
async fn package(scaler: &Scaler, outcome: &BatchOutcome, mode: SaveMode) -> Vec<Download> {
    let archive = match mode {
        SaveMode::Auto => scaler.package_auto(&outcome.artifacts).await,
        SaveMode::Archive => scaler.package_many(&outcome.artifacts).await,
        SaveMode::Files => return scaler.package_each(&outcome.artifacts),
    };
    or_individual_files(scaler, &outcome.artifacts, archive)
}

fn or_individual_files(
    scaler: &Scaler,
    artifacts: &[ResizedArtifact],
    archive: Result<Download, PackagingError>,
) -> Vec<Download> {
    match archive {
        Ok(download) => vec![download],
        Err(e) => {
            tracing::warn!("{e}; saving {} image(s) individually", artifacts.len());
            scaler.package_each(artifacts)
        }
    }
}

/// Save a download as `dir/<file_name>`.
fn write_download(dir: &Path, download: &Download) -> anyhow::Result<PathBuf> {
    let file_name = Path::new(&download.file_name)
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid download name: {:?}", download.file_name))?;
    let path = dir.join(file_name);
    std::fs::write(&path, &download.data[..])?;
    tracing::debug!("Saved {} ({} bytes)", path.display(), download.data.len());
    Ok(path)
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("resizing...");
    pb
}

fn print_summary(
    succeeded: usize,
    failed: usize,
    files_written: usize,
    bytes_written: u64,
    elapsed: Duration,
) {
    let total = succeeded + failed;
    let rate = if elapsed.as_secs_f64() > 0.0 {
        succeeded as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Resized:      {:>8}", succeeded);
    if failed > 0 {
        eprintln!("    Failed:       {:>8}", failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Files saved:  {:>8}", files_written);
    eprintln!("    Written:      {:>7.1} MB", bytes_written as f64 / 1_000_000.0);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use scaler_core::{MimeType, NoProgress};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn small_scaler() -> Scaler {
        let mut config = Config::default();
        config.resize.target_width = 8;
        Scaler::new(config).unwrap()
    }

    #[test]
    fn test_write_download_flattens_name() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download {
            file_name: "../escape/resized-a.png".to_string(),
            mime: "image/png".to_string(),
            data: scaler_core::Blob::from(&b"data"[..]),
        };

        let path = write_download(dir.path(), &download).unwrap();
        assert_eq!(path, dir.path().join("resized-a.png"));
        assert_eq!(std::fs::read(path).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_package_modes() {
        let scaler = small_scaler();
        let inputs = vec![
            InputImage::new("a.png", MimeType::Png, png_bytes(16, 16)),
            InputImage::new("b.png", MimeType::Png, png_bytes(16, 8)),
        ];
        let outcome = scaler.process(inputs, &NoProgress).await;

        let auto = package(&scaler, &outcome, SaveMode::Auto).await;
        assert_eq!(auto.len(), 1);
        assert_eq!(auto[0].file_name, "resized-images.zip");

        let files = package(&scaler, &outcome, SaveMode::Files).await;
        let names: Vec<&str> = files.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["resized-a.png", "resized-b.png"]);
    }

    #[tokio::test]
    async fn test_same_names_are_all_saved() {
        let scaler = small_scaler();
        let inputs = vec![
            InputImage::new("x.png", MimeType::Png, png_bytes(16, 16)),
            InputImage::new("x.png", MimeType::Png, png_bytes(32, 16)),
        ];
        let outcome = scaler.process(inputs, &NoProgress).await;
        let dir = tempfile::tempdir().unwrap();

        for download in package(&scaler, &outcome, SaveMode::Files).await {
            write_download(dir.path(), &download).unwrap();
        }

        let mut saved: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        saved.sort();
        assert_eq!(saved, vec!["resized-x-1.png", "resized-x.png"]);
        assert_eq!(
            std::fs::read(dir.path().join("resized-x-1.png")).unwrap(),
            &outcome.artifacts[1].data[..]
        );
    }

    #[tokio::test]
    async fn test_failed_archive_falls_back_to_files() {
        let scaler = small_scaler();
        let inputs = vec![
            InputImage::new("a.png", MimeType::Png, png_bytes(16, 16)),
            InputImage::new("b.png", MimeType::Png, png_bytes(16, 8)),
        ];
        let outcome = scaler.process(inputs, &NoProgress).await;

        let downloads = or_individual_files(
            &scaler,
            &outcome.artifacts,
            Err(PackagingError::Task("archive task panicked".to_string())),
        );
        let names: Vec<&str> = downloads.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["resized-a.png", "resized-b.png"]);
    }

    #[tokio::test]
    async fn test_read_inputs_counts_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        std::fs::write(&good, png_bytes(4, 4)).unwrap();
        let files = vec![
            DiscoveredFile {
                path: good,
                size: 0,
            },
            DiscoveredFile {
                path: dir.path().join("gone.png"),
                size: 0,
            },
        ];

        let (inputs, unreadable) = read_inputs(&files).await;
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "good.png");
        assert_eq!(unreadable, 1);
    }
}
