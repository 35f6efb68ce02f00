use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crashdiag_lib::Config;

use crate::fs_utils;
use crate::logger::RunLog;

/// Executable that marks a directory as a valid game installation.
pub const GAME_EXE: &str = "RDR2.exe";

pub fn is_game_dir(dir: &Path) -> bool {
    dir.is_dir() && dir.join(GAME_EXE).is_file()
}

/// Resolves the game installation directory.
///
/// An explicit `game_dir` from config must validate or the run fails. After
/// that the default install location is tried, then the operator is prompted
/// for a path, re-validating up to `max_attempts` times. A blank line or EOF
/// cancels the prompt.
pub fn resolve_game_dir(config: &Config, log: &RunLog) -> Result<PathBuf> {
    if let Some(dir) = &config.game_dir {
        let dir = PathBuf::from(dir);
        if is_game_dir(&dir) {
            log.info(&format!("Found Game Folder: {}", dir.display()));
            return Ok(dir);
        }
        bail!("could not find {GAME_EXE} in {}", dir.display());
    }

    if let Some(dir) = fs_utils::default_game_dir() {
        if is_game_dir(&dir) {
            log.info(&format!("Found Game Folder: {}", dir.display()));
            return Ok(dir);
        }
    }

    log.warn("Could not find game at default folder. Prompting user for game directory path.");
    if config.non_interactive.unwrap_or(false) {
        bail!("game directory not found and prompting is disabled");
    }

    let attempts = config.max_attempts.unwrap_or(3);
    let stdin = std::io::stdin();
    prompt_for_game_dir(&mut stdin.lock(), &mut std::io::stdout(), attempts, log)
}

/// Bounded interactive retry loop. Generic over its streams so tests can
/// drive it without an operator.
fn prompt_for_game_dir<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    attempts: u32,
    log: &RunLog,
) -> Result<PathBuf> {
    for _ in 0..attempts {
        write!(output, "Select your RDR2 Game Folder (blank to cancel): ")?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("reading game folder path")?;
        let picked = line.trim();
        if read == 0 || picked.is_empty() {
            bail!("game folder selection cancelled");
        }

        let dir = PathBuf::from(picked);
        if is_game_dir(&dir) {
            log.info(&format!("Found Game Folder: {}", dir.display()));
            return Ok(dir);
        }
        log.warn(&format!("Could not find {GAME_EXE} in specified path."));
    }
    bail!("no valid game folder after {attempts} attempts")
}
