use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;
use std::process::Command;

use crashdiag_lib::Config;

/// Produces the system diagnostic report by running the platform utility and
/// capturing the file it writes. The utility gets a temporary output path as
/// its final argument; the temp file is removed again once the bytes are in
/// memory, on every exit path.
pub fn capture_report(config: &Config) -> Result<Vec<u8>> {
    let out_file = tempfile::Builder::new()
        .prefix("dxdiag-")
        .suffix(".xml")
        .tempfile()
        .context("creating temporary report file")?;
    let out_path = out_file.path().to_path_buf();

    let (program, args) = report_command(config)?;

    let status = Command::new(&program)
        .args(&args)
        .arg(&out_path)
        .status()
        .with_context(|| format!("failed to start {}", program.display()))?;
    if !status.success() {
        bail!(
            "{} failed with exit code {}",
            program.display(),
            status.code().unwrap_or(-1)
        );
    }

    std::fs::read(&out_path).with_context(|| format!("reading report output {out_path:?}"))
}

/// Splits a configured override command into program and arguments, or falls
/// back to the platform default.
fn report_command(config: &Config) -> Result<(PathBuf, Vec<String>)> {
    if let Some(cmd) = &config.dxdiag {
        let mut parts = cmd.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("diagnostic report command is empty"))?;
        return Ok((PathBuf::from(program), parts.collect()));
    }
    default_report_command()
}

/// A 32-bit process on a 64-bit OS only reaches the real dxdiag through the
/// sysnative alias; file-system redirection hides System32's copy.
#[cfg(windows)]
fn default_report_command() -> Result<(PathBuf, Vec<String>)> {
    let windir = std::env::var_os("WINDIR").context("WINDIR is not set")?;
    let windir = PathBuf::from(windir);
    let system = if cfg!(target_pointer_width = "32")
        && std::env::var_os("PROCESSOR_ARCHITEW6432").is_some()
    {
        windir.join("sysnative")
    } else {
        windir.join("System32")
    };
    Ok((system.join("dxdiag.exe"), vec!["/x".to_string()]))
}

#[cfg(not(windows))]
fn default_report_command() -> Result<(PathBuf, Vec<String>)> {
    bail!("no diagnostic report utility is available on this platform")
}
