//! Theme packaging: archive the theme tree for distribution.
//!
//! Walks the full theme directory, leaves out the dependency-install and
//! distribution directories plus dot-entries, and writes everything else
//! into `dist/<theme-name>.zip`. The name comes from `[theme] name` at
//! run time, never from a constant.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use thiserror::Error;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::config::PatinaConfig;
use crate::log;
use crate::utils::path::{first_component, to_slash_string};

/// Packaging errors.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to create {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk theme directory")]
    Walk(#[from] jwalk::Error),

    #[error("failed to write archive")]
    Zip(#[from] zip::result::ZipError),
}

/// Archive the theme into `dist/<name>.zip`, returning the archive path.
pub fn archive(config: &PatinaConfig) -> Result<PathBuf, PackageError> {
    let dist = &config.package.dist;
    fs::create_dir_all(dist).map_err(|source| PackageError::Create {
        path: dist.clone(),
        source,
    })?;

    let archive_path = dist.join(format!("{}.zip", config.theme.name));
    let file = File::create(&archive_path).map_err(|source| PackageError::Create {
        path: archive_path.clone(),
        source,
    })?;

    let entries = collect_entries(config.get_root(), &config.package.excluded_roots())?;
    write_archive(file, config.get_root(), &entries)?;

    log!(
        "zip";
        "packaged {} files into {}",
        entries.len(),
        config.root_relative(&archive_path).display()
    );
    Ok(archive_path)
}

/// Collect the files to archive, sorted for deterministic entry order.
///
/// Dot-entries are skipped by the walker; excluded top-level directories
/// are skipped by their first path component.
fn collect_entries(root: &Path, excluded_roots: &[String]) -> Result<Vec<PathBuf>, PackageError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).skip_hidden(true).sort(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        if let Some(first) = first_component(relative)
            && excluded_roots.contains(&first)
        {
            continue;
        }

        entries.push(relative.to_path_buf());
    }

    Ok(entries)
}

/// Write the collected entries into a zip archive.
fn write_archive(
    file: File,
    root: &Path,
    entries: &[PathBuf],
) -> Result<(), PackageError> {
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for relative in entries {
        let absolute = root.join(relative);
        writer.start_file(to_slash_string(relative), options)?;

        let mut reader = File::open(&absolute).map_err(|source| PackageError::Read {
            path: absolute.clone(),
            source,
        })?;
        io::copy(&mut reader, &mut writer).map_err(|source| PackageError::Read {
            path: absolute,
            source,
        })?;
    }

    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Lay out a minimal theme tree with content that must be excluded.
    fn scaffold_theme(root: &Path) {
        fs::create_dir_all(root.join("assets/built")).unwrap();
        fs::create_dir_all(root.join("_layouts")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();

        fs::write(root.join("patina.toml"), "[theme]\nname = \"demo\"\n").unwrap();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("_layouts/post.html"), "<article></article>").unwrap();
        fs::write(root.join("assets/built/screen.css"), "body{}").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "module.exports = 1").unwrap();
        fs::write(root.join("dist/stale.zip"), "old archive").unwrap();
        fs::write(root.join(".gitignore"), "dist/").unwrap();
    }

    fn test_config(root: &Path, name: &str) -> PatinaConfig {
        let mut config = PatinaConfig::default();
        config.root = root.to_path_buf();
        config.theme.name = name.into();
        config.package.dist = root.join("dist");
        config
    }

    fn archive_names(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_archive_name_derives_from_theme_name() {
        let dir = tempdir().unwrap();
        scaffold_theme(dir.path());

        let path = archive(&test_config(dir.path(), "solstice")).unwrap();
        assert_eq!(path, dir.path().join("dist/solstice.zip"));
        assert!(path.is_file());

        // Renaming the theme changes the archive filename
        let renamed = archive(&test_config(dir.path(), "equinox")).unwrap();
        assert_eq!(renamed, dir.path().join("dist/equinox.zip"));
    }

    #[test]
    fn test_archive_excludes_dependency_and_dist_dirs() {
        let dir = tempdir().unwrap();
        scaffold_theme(dir.path());

        let path = archive(&test_config(dir.path(), "demo")).unwrap();
        let names = archive_names(&path);

        assert!(!names.is_empty());
        for name in &names {
            assert!(
                !name.starts_with("node_modules/") && !name.starts_with("dist/"),
                "unexpected archive entry: {name}"
            );
        }
    }

    #[test]
    fn test_archive_contains_theme_files() {
        let dir = tempdir().unwrap();
        scaffold_theme(dir.path());

        let path = archive(&test_config(dir.path(), "demo")).unwrap();
        let names = archive_names(&path);

        assert!(names.contains(&"index.html".to_string()));
        assert!(names.contains(&"_layouts/post.html".to_string()));
        assert!(names.contains(&"assets/built/screen.css".to_string()));
        assert!(names.contains(&"patina.toml".to_string()));
    }

    #[test]
    fn test_archive_skips_dot_entries() {
        let dir = tempdir().unwrap();
        scaffold_theme(dir.path());

        let path = archive(&test_config(dir.path(), "demo")).unwrap();
        let names = archive_names(&path);
        assert!(!names.contains(&".gitignore".to_string()));
    }

    #[test]
    fn test_collect_entries_sorted() {
        let dir = tempdir().unwrap();
        scaffold_theme(dir.path());

        let entries = collect_entries(dir.path(), &["node_modules".into(), "dist".into()]).unwrap();
        let mut sorted = entries.clone();
        sorted.sort();
        assert_eq!(entries, sorted);
    }
}
