use anyhow::{Context, Result};
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Turns a user-supplied path into the absolute form stored in the settings file.
///
/// `~` and `$HOME` are replaced with the home directory, relative paths are
/// resolved against the current directory and `.`/`..` are removed
/// lexically. The path does not have to exist and symbolic links are kept as
/// written, so exclusions match the paths the walker produces.
pub fn expand_path(input: &Path) -> Result<PathBuf> {
    let expanded = expand_home(input);
    let abs_path = std::path::absolute(&expanded)
        .with_context(|| format!("The path '{}' is invalid", input.display()))?;
    Ok(abs_path.clean())
}

/// Non UTF-8 paths are returned unchanged.
fn expand_home(input: &Path) -> PathBuf {
    let Some(text) = input.to_str() else {
        return input.to_path_buf();
    };
    let rest = text
        .strip_prefix('~')
        .or_else(|| text.strip_prefix("$HOME"));
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with(['/', '\\']) => {
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        _ => input.to_path_buf(),
    }
}
