use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crashdiag_lib::Config;

use crate::dxdiag;
use crate::fs_utils;
use crate::gamedir;
use crate::logger::RunLog;
use crate::naming;
use crate::packaging::zip::{Compressor, ZipBundle};

/// Outcome of one pack operation. Failures recorded here never abort the
/// run; fatal errors travel as `anyhow::Error` instead.
#[derive(Debug)]
pub enum PackResult {
    Packed(String),
    Skipped(String),
    Failed(String),
}

impl fmt::Display for PackResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackResult::Packed(entry) => write!(f, "packed {entry}"),
            PackResult::Skipped(reason) => write!(f, "skipped: {reason}"),
            PackResult::Failed(error) => write!(f, "failed: {error}"),
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct BundleOutcome {
    pub archive_path: PathBuf,
}

/// Executes the fixed pack sequence: settings file, diagnostic report, game
/// files, then the run log itself as the final entry.
pub async fn run(config: &Config, log: &RunLog) -> Result<BundleOutcome> {
    let archive_path = resolve_output_path(config)?;

    let compressor = if config.compress.unwrap_or(true) {
        Compressor::Deflate
    } else {
        Compressor::Stored
    };
    let mut bundle = ZipBundle::create(&archive_path, compressor).await?;

    let mut results = Vec::new();
    results.push(pack_settings(&mut bundle, config, log).await?);
    results.push(pack_report(&mut bundle, config, log).await);

    let game_dir = gamedir::resolve_game_dir(config, log)?;
    pack_game_files(&mut bundle, &game_dir, log, &mut results).await?;

    for result in &results {
        log.verbose(&result.to_string());
    }
    log.info(&format!(
        "Successfully packed diagnostic data into: {}",
        archive_path.display()
    ));

    pack_run_log(&mut bundle, log).await?;
    bundle.finish().await?;

    Ok(BundleOutcome { archive_path })
}

/// `{output}/CrashDiagnostics-{yy-MM-dd}.zip`; a leftover archive from an
/// earlier run on the same date is deleted first.
fn resolve_output_path(config: &Config) -> Result<PathBuf> {
    let dir = PathBuf::from(config.output.as_deref().unwrap_or("."));
    let path = dir.join(naming::archive_file_name(Local::now().date_naive()));
    if path.exists() {
        std::fs::remove_file(&path)
            .with_context(|| format!("removing previous archive {path:?}"))?;
    }
    Ok(path)
}

/// A missing settings file is only a warning; a read error on an existing
/// one still aborts the run.
async fn pack_settings(
    bundle: &mut ZipBundle,
    config: &Config,
    log: &RunLog,
) -> Result<PackResult> {
    log.info("Retrieving game settings file");
    let path = config
        .settings_file
        .as_ref()
        .map(PathBuf::from)
        .or_else(fs_utils::default_settings_path);
    let Some(path) = path.filter(|p| p.is_file()) else {
        log.warn("No game settings file could be found.");
        return Ok(PackResult::Skipped("settings file not found".into()));
    };
    bundle.add_file("system.xml", &path).await?;
    log.info("Packed game settings file");
    Ok(PackResult::Packed("system.xml".into()))
}

/// Skip-tolerant in full: a missing or failing diagnostic utility is logged
/// and the run continues without `dxdiag.xml`.
async fn pack_report(bundle: &mut ZipBundle, config: &Config, log: &RunLog) -> PackResult {
    log.info("Retrieving DirectX Diagnostics");
    let data = match dxdiag::capture_report(config) {
        Ok(data) => data,
        Err(err) => {
            log.error(&format!("Failed to retrieve DirectX Diagnostics\n{err:#}"));
            return PackResult::Failed(format!("{err:#}"));
        }
    };
    match bundle.add_bytes("dxdiag.xml", &data).await {
        Ok(()) => {
            log.info("Packed DirectX Diagnostics");
            PackResult::Packed("dxdiag.xml".into())
        }
        Err(err) => {
            log.error(&format!("Failed to retrieve DirectX Diagnostics\n{err:#}"));
            PackResult::Failed(format!("{err:#}"))
        }
    }
}

/// Top-level listing, optional `scripts` listing, and every `*.log` directly
/// under the game directory.
async fn pack_game_files(
    bundle: &mut ZipBundle,
    game_dir: &Path,
    log: &RunLog,
    results: &mut Vec<PackResult>,
) -> Result<()> {
    log.info("Grabbing hierarchy of game directory");
    let listing = fs_utils::render_listing(&fs_utils::list_dir_entries(game_dir)?);
    bundle
        .add_bytes("fs_game_folder.txt", listing.as_bytes())
        .await?;
    results.push(PackResult::Packed("fs_game_folder.txt".into()));

    let scripts = game_dir.join("scripts");
    if scripts.is_dir() {
        log.info("Grabbing hierarchy of scripts directory");
        let listing = fs_utils::render_listing(&fs_utils::list_dir_entries(&scripts)?);
        bundle
            .add_bytes("fx_scripts_folder.txt", listing.as_bytes())
            .await?;
        results.push(PackResult::Packed("fx_scripts_folder.txt".into()));
    } else {
        log.warn("No scripts directory found, skipping.");
        results.push(PackResult::Skipped("no scripts directory".into()));
    }

    log.info("Grabbing *.log files");
    for file in fs_utils::log_files(game_dir)? {
        // Entries are named by full source path, matching the archive layout
        // established downstream; basenames alone would collide anyway once
        // other directories start contributing logs.
        let name = file.display().to_string();
        bundle.add_file(&name, &file).await?;
        results.push(PackResult::Packed(name));
    }

    log.info("Finished packing game files");
    Ok(())
}

/// Packs the run's own log as the final entry and removes it from disk; past
/// this point nothing may write to the log file again.
async fn pack_run_log(bundle: &mut ZipBundle, log: &RunLog) -> Result<()> {
    bundle.add_file("CrashDiagnostics.log", log.path()).await?;
    tokio::fs::remove_file(log.path())
        .await
        .with_context(|| format!("removing run log {:?}", log.path()))?;
    Ok(())
}
