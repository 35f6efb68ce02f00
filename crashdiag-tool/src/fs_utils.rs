use anyhow::{Context, Result};
use glob::Pattern;
use once_cell::sync::Lazy;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Files under the game directory that are packed individually.
static LOG_PATTERN: Lazy<Pattern> = Lazy::new(|| Pattern::new("*.log").expect("valid pattern"));

/// Lists a directory's immediate children as full paths, in whatever order
/// the platform enumeration yields them. Not recursive, not sorted.
pub fn list_dir_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {dir:?}"))? {
        entries.push(entry?.path());
    }
    Ok(entries)
}

/// Renders a listing as newline-joined paths, written verbatim as archive
/// entry content.
pub fn render_listing(entries: &[PathBuf]) -> String {
    entries
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `*.log` files directly under `dir`, in enumeration order.
pub fn log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for path in list_dir_entries(dir)? {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if path.is_file() && LOG_PATTERN.matches(&name) {
            found.push(path);
        }
    }
    Ok(found)
}

/// Well-known location of the game settings file under the user's documents
/// tree.
pub fn default_settings_path() -> Option<PathBuf> {
    let home = env::var_os("USERPROFILE").or_else(|| env::var_os("HOME"))?;
    Some(
        PathBuf::from(home)
            .join("Documents")
            .join("Rockstar Games")
            .join("Red Dead Redemption 2")
            .join("Settings")
            .join("system.xml"),
    )
}

/// Default installation directory under the program-files tree. `None` where
/// no such tree exists; resolution then falls back to config or the prompt.
pub fn default_game_dir() -> Option<PathBuf> {
    let programs = env::var_os("PROGRAMFILES")?;
    Some(
        PathBuf::from(programs)
            .join("Rockstar Games")
            .join("Red Dead Redemption 2"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn listing_is_flat_and_full_path() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("nested.txt")).unwrap();

        let entries = list_dir_entries(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|p| p.starts_with(dir.path())));
        assert!(!entries.iter().any(|p| p.ends_with("nested.txt")));
    }

    #[test]
    fn listing_renders_newline_joined() {
        let entries = vec![PathBuf::from("/g/a.txt"), PathBuf::from("/g/b.txt")];
        assert_eq!(render_listing(&entries), "/g/a.txt\n/g/b.txt");
        assert_eq!(render_listing(&[]), "");
    }

    #[test]
    fn log_files_match_extension_at_top_level_only() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.log")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("deep.log")).unwrap();

        let found = log_files(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("a.log"));
    }

    #[test]
    fn directories_named_like_logs_are_not_packed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("folder.log")).unwrap();
        assert!(log_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(list_dir_entries(Path::new("/no/such/dir/here")).is_err());
    }
}
