//! Batch packager: single downloads and zip archives.
//!
//! Single downloads are named `<prefix><name>` (default `resized-<name>`).
//! Archive entries keep the plain artifact name, flat, in artifact order.
//! Duplicate entry names get `-1`, `-2`, ... inserted before the extension,
//! and so do duplicate single downloads saved side by side.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Instant;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::config::{ArchiveCompression, PackageConfig};
use crate::error::PackagingError;
use crate::types::{Blob, Download, ResizedArtifact};

/// MIME type of produced archives.
pub const ZIP_MIME: &str = "application/zip";

/// Builds downloads from resized artifacts.
#[derive(Debug, Clone)]
pub struct Packager {
    config: PackageConfig,
}

impl Packager {
    /// Create a packager with the given settings.
    pub fn new(config: PackageConfig) -> Self {
        Self { config }
    }

    /// Suggested file name for a single download of `name`.
    pub fn download_name(&self, name: &str) -> String {
        format!("{}{}", self.config.download_prefix, name)
    }

    /// Expose one artifact for direct save.
    pub fn package_one(&self, artifact: &ResizedArtifact) -> Download {
        Download {
            file_name: self.download_name(&artifact.name),
            mime: artifact.mime.as_str().to_string(),
            data: Arc::clone(&artifact.data),
        }
    }

    /// One download per artifact, with colliding names disambiguated the
    /// same way as archive entries (`resized-x.png`, `resized-x-1.png`).
    pub fn package_each(&self, artifacts: &[ResizedArtifact]) -> Vec<Download> {
        let names = unique_entry_names(artifacts.iter().map(|a| a.name.as_str()));
        names
            .into_iter()
            .zip(artifacts)
            .map(|(name, artifact)| Download {
                file_name: self.download_name(&name),
                mime: artifact.mime.as_str().to_string(),
                data: Arc::clone(&artifact.data),
            })
            .collect()
    }

    /// Bundle all artifacts into an archive with the configured name.
    pub async fn package_many(
        &self,
        artifacts: &[ResizedArtifact],
    ) -> Result<Download, PackagingError> {
        self.package_many_named(artifacts, &self.config.archive_name)
            .await
    }

    /// Bundle all artifacts into an archive called `archive_name`.
    pub async fn package_many_named(
        &self,
        artifacts: &[ResizedArtifact],
        archive_name: &str,
    ) -> Result<Download, PackagingError> {
        if artifacts.is_empty() {
            return Err(PackagingError::Empty);
        }

        let start = Instant::now();
        let names = unique_entry_names(artifacts.iter().map(|a| a.name.as_str()));
        let entries: Vec<(String, Blob)> = names
            .into_iter()
            .zip(artifacts.iter().map(|a| Arc::clone(&a.data)))
            .collect();
        let count = entries.len();
        let compression = self.config.compression;

        let bytes = tokio::task::spawn_blocking(move || build_archive(entries, compression))
            .await
            .map_err(|e| PackagingError::Task(e.to_string()))??;

        tracing::info!(
            "Packaged {} image(s) into {} ({} bytes) in {:?}",
            count,
            archive_name,
            bytes.len(),
            start.elapsed()
        );

        Ok(Download {
            file_name: archive_name.to_string(),
            mime: ZIP_MIME.to_string(),
            data: Arc::from(bytes),
        })
    }

    /// One artifact → single download, several → archive.
    pub async fn package_auto(
        &self,
        artifacts: &[ResizedArtifact],
    ) -> Result<Download, PackagingError> {
        match artifacts {
            [] => Err(PackagingError::Empty),
            [single] => Ok(self.package_one(single)),
            many => self.package_many(many).await,
        }
    }
}

/// Write `entries` into an in-memory zip, in order.
pub fn build_archive(
    entries: Vec<(String, Blob)>,
    compression: ArchiveCompression,
) -> Result<Vec<u8>, PackagingError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(compression.method());
    for (name, data) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&data)?;
    }
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Assign collision-free, flat entry names.
///
/// The first occurrence of a name keeps it. Later ones get the smallest
/// `-n` suffix (before the extension) that is still free. Path separators
/// become `_`.
pub fn unique_entry_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for raw in names {
        let name = flatten_name(raw);
        let chosen = if taken.contains(&name) {
            let (stem, ext) = split_extension(&name);
            (1..)
                .map(|n| match ext {
                    Some(ext) => format!("{stem}-{n}.{ext}"),
                    None => format!("{stem}-{n}"),
                })
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default()
        } else {
            name
        };
        taken.insert(chosen.clone());
        unique.push(chosen);
    }

    unique
}

fn flatten_name(name: &str) -> String {
    let flat: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if flat.is_empty() {
        "image".to_string()
    } else {
        flat
    }
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_unique_names_pass_through() {
        let names = unique_entry_names(["a.png", "b.jpg"]);
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_unique_names_suffix_collisions() {
        let names = unique_entry_names(["a.png", "a.png", "a.png"]);
        assert_eq!(names, vec!["a.png", "a-1.png", "a-2.png"]);
    }

    #[test]
    fn test_unique_names_skip_taken_suffix() {
        let names = unique_entry_names(["a.png", "a-1.png", "a.png"]);
        assert_eq!(names, vec!["a.png", "a-1.png", "a-2.png"]);
    }

    #[test]
    fn test_unique_names_without_extension_and_dotfiles() {
        let names = unique_entry_names(["photo", "photo", ".hidden", ".hidden"]);
        assert_eq!(names, vec!["photo", "photo-1", ".hidden", ".hidden-1"]);
    }

    #[test]
    fn test_unique_names_are_flat() {
        let names = unique_entry_names(["dir/a.png", "..\\b.png", ""]);
        assert_eq!(names, vec!["dir_a.png", ".._b.png", "image"]);
    }

    #[test]
    fn test_build_archive_round_trip() {
        let entries = vec![
            ("one.png".to_string(), Blob::from(&b"first"[..])),
            ("two.jpg".to_string(), Blob::from(&b"second"[..])),
        ];
        for compression in [ArchiveCompression::Stored, ArchiveCompression::Deflated] {
            let bytes = build_archive(entries.clone(), compression).unwrap();
            let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
            assert_eq!(archive.len(), 2);

            let mut file = archive.by_index(1).unwrap();
            assert_eq!(file.name(), "two.jpg");
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).unwrap();
            assert_eq!(contents, b"second");
        }
    }

    #[test]
    fn test_download_name_is_stable() {
        let packager = Packager::new(PackageConfig::default());
        assert_eq!(packager.download_name("cat.jpg"), "resized-cat.jpg");
        assert_eq!(
            packager.download_name("cat.jpg"),
            packager.download_name("cat.jpg")
        );
    }

    #[test]
    fn test_package_each_disambiguates_duplicates() {
        let registry = crate::handle::HandleRegistry::new();
        let artifact = |name: &str, byte: u8| {
            let data = Blob::from(vec![byte; 4]);
            ResizedArtifact {
                name: name.to_string(),
                mime: crate::types::MimeType::Png,
                width: 1,
                height: 1,
                source_width: 1,
                source_height: 1,
                handle: registry.register(Arc::clone(&data)),
                data,
            }
        };
        let artifacts = vec![artifact("x.png", 1), artifact("x.png", 2), artifact("y.png", 3)];

        let downloads = Packager::new(PackageConfig::default()).package_each(&artifacts);
        let names: Vec<&str> = downloads.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["resized-x.png", "resized-x-1.png", "resized-y.png"]);
        assert_eq!(&downloads[1].data[..], &[2, 2, 2, 2]);
    }

    #[tokio::test]
    async fn test_package_many_empty_fails() {
        let packager = Packager::new(PackageConfig::default());
        let err = packager.package_many(&[]).await.unwrap_err();
        assert!(matches!(err, PackagingError::Empty));
        let err = packager.package_auto(&[]).await.unwrap_err();
        assert!(matches!(err, PackagingError::Empty));
    }
}
