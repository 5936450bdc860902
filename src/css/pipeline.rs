//! The per-file transform chain and directory driver.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions};
use lightningcss::targets::{Browsers, Features, Targets};
use parcel_sourcemap::SourceMap;

use super::CssError;
use crate::config::PatinaConfig;

/// Resolved pipeline options shared by every file of one invocation.
pub struct CssOptions {
    /// Strip whitespace in the emitted CSS.
    pub minify: bool,
    /// Lowering/prefixing targets resolved from browserslist queries.
    pub targets: Targets,
    /// Root recorded in emitted source maps.
    pub project_root: PathBuf,
}

impl CssOptions {
    pub fn from_config(config: &PatinaConfig) -> Result<Self, CssError> {
        Ok(Self {
            minify: config.build.minify,
            targets: parse_targets(&config.build.targets)?,
            project_root: config.root.clone(),
        })
    }
}

/// Resolve browserslist queries into lightningcss targets.
pub fn parse_targets(queries: &[String]) -> Result<Targets, CssError> {
    let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str)).map_err(
        |e| CssError::Targets {
            query: queries.join(", "),
            message: e.to_string(),
        },
    )?;
    Ok(Targets {
        browsers,
        include: Features::empty(),
        exclude: Features::empty(),
    })
}

/// One successfully built stylesheet.
#[derive(Debug)]
pub struct BuiltFile {
    /// Source entry file.
    pub source: PathBuf,
    /// Emitted stylesheet path.
    pub css: PathBuf,
    /// Emitted source map path.
    pub map: PathBuf,
    /// Emitted stylesheet size in bytes.
    pub bytes: usize,
}

/// Build every top-level `*.css` file in the configured source directory.
///
/// Missing source directory and unwritable output directory are fatal;
/// per-file transform failures are returned as values alongside the
/// successes, in filename order.
pub fn build_dir(config: &PatinaConfig) -> Result<Vec<Result<BuiltFile, CssError>>> {
    let source = &config.build.source;
    let entries = css_entries(source)
        .with_context(|| format!("failed to scan {}", source.display()))?;

    fs::create_dir_all(&config.build.output)
        .with_context(|| format!("failed to create {}", config.build.output.display()))?;

    let options = CssOptions::from_config(config)?;
    let outcomes = entries
        .iter()
        .map(|entry| build_file(entry, &config.build.output, &options))
        .collect();
    Ok(outcomes)
}

/// Top-level `*.css` files of a directory, sorted by filename.
fn css_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("css")
        })
        .collect();
    entries.sort();
    Ok(entries)
}

/// Run one entry file through the transform chain.
///
/// Writes `<name>.css` and `<name>.css.map` into `out_dir` and appends the
/// `sourceMappingURL` comment. Nothing is written when any stage fails.
pub fn build_file(
    input: &Path,
    out_dir: &Path,
    options: &CssOptions,
) -> Result<BuiltFile, CssError> {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let css_out = out_dir.join(&file_name);
    let map_name = format!("{file_name}.map");
    let map_out = out_dir.join(&map_name);

    // `@import` inlining happens at parse time via the bundler
    let provider = FileProvider::new();
    let mut bundler = Bundler::new(&provider, None, ParserOptions::default());
    let mut stylesheet = bundler.bundle(input).map_err(|e| CssError::Parse {
        path: input.to_path_buf(),
        message: e.to_string(),
    })?;

    // Targeted lowering: custom properties, color functions, prefixes
    stylesheet
        .minify(MinifyOptions {
            targets: options.targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| CssError::Transform {
            path: input.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut source_map = SourceMap::new(&options.project_root.to_string_lossy());
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: options.minify,
            source_map: Some(&mut source_map),
            targets: options.targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| CssError::Print {
            path: input.to_path_buf(),
            message: e.to_string(),
        })?;

    let map_json = source_map
        .to_json(None)
        .map_err(|e| CssError::SourceMap {
            path: input.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut code = result.code;
    code.push_str(&format!("\n/*# sourceMappingURL={map_name} */\n"));

    fs::write(&css_out, code.as_bytes()).map_err(|source| CssError::Write {
        path: css_out.clone(),
        source,
    })?;
    fs::write(&map_out, map_json.as_bytes()).map_err(|source| CssError::Write {
        path: map_out.clone(),
        source,
    })?;

    Ok(BuiltFile {
        source: input.to_path_buf(),
        css: css_out,
        map: map_out,
        bytes: code.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_options(root: &Path) -> CssOptions {
        CssOptions {
            minify: true,
            targets: parse_targets(&["defaults".into()]).unwrap(),
            project_root: root.to_path_buf(),
        }
    }

    #[test]
    fn test_build_file_emits_css_and_map() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("built");
        fs::create_dir_all(&out).unwrap();

        let input = dir.path().join("screen.css");
        fs::write(&input, "body { color: red; }\n").unwrap();

        let built = build_file(&input, &out, &test_options(dir.path())).unwrap();

        assert!(built.css.is_file());
        assert!(built.map.is_file());
        assert_eq!(built.css, out.join("screen.css"));
        assert_eq!(built.map, out.join("screen.css.map"));

        let code = fs::read_to_string(&built.css).unwrap();
        assert!(code.contains("color:red"));
        assert!(code.contains("sourceMappingURL=screen.css.map"));
    }

    #[test]
    fn test_build_file_inlines_imports() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("built");
        fs::create_dir_all(&out).unwrap();

        fs::write(dir.path().join("vars.css"), "h1 { font-weight: 700; }\n").unwrap();
        let input = dir.path().join("screen.css");
        fs::write(&input, "@import \"vars.css\";\nbody { margin: 0; }\n").unwrap();

        let built = build_file(&input, &out, &test_options(dir.path())).unwrap();
        let code = fs::read_to_string(&built.css).unwrap();

        // The partial's rule is inlined; no @import survives
        assert!(code.contains("font-weight:700"));
        assert!(!code.contains("@import"));
    }

    #[test]
    fn test_build_file_invalid_css_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("built");
        fs::create_dir_all(&out).unwrap();

        let input = dir.path().join("broken.css");
        fs::write(&input, "body { color: }\n@media {").unwrap();

        let err = build_file(&input, &out, &test_options(dir.path())).unwrap_err();
        assert!(matches!(err, CssError::Parse { .. }));
        assert!(!out.join("broken.css").exists());
        assert!(!out.join("broken.css.map").exists());
    }

    #[test]
    fn test_build_dir_reports_per_file_outcomes() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("assets/css");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.css"), "a { color: blue; }\n").unwrap();
        fs::write(source.join("b.css"), "b { color: }\n").unwrap();
        // Non-CSS files are not entries
        fs::write(source.join("notes.txt"), "not css").unwrap();

        let mut config = PatinaConfig::default();
        config.root = dir.path().to_path_buf();
        config.build.source = source;
        config.build.output = dir.path().join("assets/built");

        let outcomes = build_dir(&config).unwrap();
        assert_eq!(outcomes.len(), 2);
        // Sorted by filename: a.css first
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());
        assert!(config.build.output.join("a.css").is_file());
        assert!(!config.build.output.join("b.css").exists());
    }

    #[test]
    fn test_build_dir_missing_source_is_fatal() {
        let dir = tempdir().unwrap();
        let mut config = PatinaConfig::default();
        config.root = dir.path().to_path_buf();
        config.build.source = dir.path().join("no-such-dir");
        config.build.output = dir.path().join("built");

        assert!(build_dir(&config).is_err());
    }

    #[test]
    fn test_parse_targets_rejects_garbage() {
        let err = parse_targets(&["definitely not a browser".into()]).unwrap_err();
        assert!(matches!(err, CssError::Targets { .. }));
    }
}
