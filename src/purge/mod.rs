//! Unused-style purge step.
//!
//! patina does not analyze class usage itself. The `[purge]` section is
//! static data — content globs and plugin registrations — compiled here
//! into the external utility-CSS tool's command line and executed as a
//! child process, the same way a CSS processor hook runs.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow, bail};

use crate::config::PatinaConfig;
use crate::{debug, log};

/// A fully resolved purge tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Compile the `[purge]` section into a tool invocation.
///
/// Shape: `command... --content <globs> [--plugin <name>]... -i <input>
/// -o <output> [--minify]`. Glob order follows the config so the tool
/// scans content deterministically.
pub fn compile_command(config: &PatinaConfig, output: &Path) -> Result<PurgeCommand> {
    let purge = &config.purge;
    let input = purge
        .input
        .as_ref()
        .ok_or_else(|| anyhow!("purge input not configured"))?;

    let mut command = purge.command.clone();
    if command.is_empty() {
        bail!("purge command not configured");
    }
    let program = command.remove(0);

    let mut args = command;
    args.extend(["--content".into(), purge.content.join(",")]);
    for plugin in &purge.plugins {
        args.extend(["--plugin".into(), plugin.clone()]);
    }
    args.extend([
        "-i".into(),
        input.display().to_string(),
        "-o".into(),
        output.display().to_string(),
    ]);
    if config.build.minify {
        args.push("--minify".into());
    }

    Ok(PurgeCommand { program, args })
}

/// Run the purge tool over the configured framework stylesheet.
///
/// The purged output replaces the file of the same name in the build
/// output directory. No-op when `[purge]` is disabled.
pub fn run(config: &PatinaConfig) -> Result<()> {
    if !config.purge.enable {
        return Ok(());
    }

    let input = config
        .purge
        .input
        .as_ref()
        .ok_or_else(|| anyhow!("purge input not configured"))?;
    let file_name = input
        .file_name()
        .ok_or_else(|| anyhow!("purge input has no file name: {}", input.display()))?;
    let output = config.build.output.join(file_name);

    warn_unmatched_content(config);

    let command = compile_command(config, &output)?;
    debug!("purge"; "{} {}", command.program, command.args.join(" "));

    let mut child = Command::new(&command.program);
    child.args(&command.args).current_dir(config.get_root());
    if config.purge.quiet {
        child.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let status = child
        .status()
        .with_context(|| format!("failed to run `{}`", command.program))?;
    if !status.success() {
        bail!("`{}` exited with {}", command.program, status);
    }

    log!("purge"; "purged {}", config.root_relative(&output).display());
    Ok(())
}

/// Warn when a configured content glob matches nothing.
///
/// An empty scan set makes the tool drop every class, which always means
/// a glob typo rather than an intentionally empty theme.
fn warn_unmatched_content(config: &PatinaConfig) {
    for pattern in &config.purge.content {
        let absolute = config.root_join(pattern);
        let matched = glob::glob(&absolute.to_string_lossy())
            .map(|paths| paths.filter_map(std::result::Result::ok).next().is_some())
            .unwrap_or(false);
        if !matched {
            log!("purge"; "content glob matches nothing: {}", pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatinaConfig;
    use std::path::PathBuf;

    fn purge_config() -> PatinaConfig {
        let mut config = PatinaConfig::default();
        config.purge.enable = true;
        config.purge.input = Some(PathBuf::from("assets/css/framework.css"));
        config.purge.content = vec!["_layouts/**/*.html".into(), "*.md".into()];
        config
    }

    #[test]
    fn test_compile_command_shape() {
        let config = purge_config();
        let command = compile_command(&config, Path::new("assets/built/framework.css")).unwrap();

        assert_eq!(command.program, "tailwindcss");
        let args = command.args.join(" ");
        assert!(args.contains("--content _layouts/**/*.html,*.md"));
        assert!(args.contains("--plugin typography"));
        assert!(args.contains("-i assets/css/framework.css"));
        assert!(args.contains("-o assets/built/framework.css"));
        assert!(args.ends_with("--minify"));
    }

    #[test]
    fn test_compile_command_respects_minify_off() {
        let mut config = purge_config();
        config.build.minify = false;
        let command = compile_command(&config, Path::new("out.css")).unwrap();
        assert!(!command.args.contains(&"--minify".to_string()));
    }

    #[test]
    fn test_compile_command_multi_word_command() {
        let mut config = purge_config();
        config.purge.command = vec!["npx".into(), "tailwindcss".into()];
        let command = compile_command(&config, Path::new("out.css")).unwrap();
        assert_eq!(command.program, "npx");
        assert_eq!(command.args[0], "tailwindcss");
    }

    #[test]
    fn test_compile_command_requires_input() {
        let mut config = purge_config();
        config.purge.input = None;
        assert!(compile_command(&config, Path::new("out.css")).is_err());
    }

    #[test]
    fn test_content_globs_preserve_order() {
        let config = purge_config();
        let command = compile_command(&config, Path::new("out.css")).unwrap();
        let idx = command.args.iter().position(|a| a == "--content").unwrap();
        assert_eq!(command.args[idx + 1], "_layouts/**/*.html,*.md");
    }

    #[test]
    fn test_run_disabled_is_noop() {
        let config = PatinaConfig::default();
        assert!(run(&config).is_ok());
    }
}
