use chrono::Local;
use clap::Parser;
use std::{collections::HashMap, env, fs, path::PathBuf, process};

use crashdiag_lib::Config;

mod bundler;
mod dxdiag;
mod fs_utils;
mod gamedir;
mod logger;
mod naming;
mod packaging;

use logger::RunLog;

#[derive(Parser, Debug)]
#[command(author, version, about = "Crash Diagnostics Tool", long_about = None)]
pub struct Cli {
    /// Directory receiving the archive and run log (default: current directory)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Game installation directory (skips the interactive prompt)
    #[arg(short, long)]
    pub game_dir: Option<String>,

    /// Path of the game settings file to pack
    #[arg(short, long)]
    pub settings_file: Option<String>,

    /// Diagnostic report command override (output path is appended)
    #[arg(long)]
    pub dxdiag: Option<String>,

    /// Maximum interactive attempts at locating the game directory
    #[arg(short, long)]
    pub max_attempts: Option<u32>,

    /// Fail instead of prompting when the game directory cannot be found
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub non_interactive: bool,

    /// Store entries without compression
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub store: bool,

    /// Generate YAML config to stdout
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub generate_yaml_config: bool,
}

fn main() {
    let cli = Cli::parse();

    // Step 1: Read environment
    let env_config = read_env();

    // Step 2: Read config file (if exists)
    let mut file_config = Config::default();
    if let Some(path) = cli.config.clone().or(env_config.config.clone()) {
        file_config = match read_config_file(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("Error: could not read config file {path}: {err:#}");
                process::exit(2);
            }
        };
    }

    // Step 3: Merge configs: env < file < CLI
    let mut merged = merge_configs(env_config, file_config, cli_to_config(&cli));

    // Apply defaults for optional parameters
    if merged.output.is_none() {
        merged.output = Some(".".to_string());
    }
    if merged.max_attempts.is_none() {
        merged.max_attempts = Some(3);
    }
    if merged.compress.is_none() {
        merged.compress = Some(true);
    }
    if merged.non_interactive.is_none() {
        merged.non_interactive = Some(false);
    }

    // Generate YAML config if requested
    if cli.generate_yaml_config {
        match serde_yaml::to_string(&merged) {
            Ok(yaml) => {
                println!("{yaml}");
                return;
            }
            Err(err) => {
                eprintln!("Error: could not render config: {err}");
                process::exit(2);
            }
        }
    }

    let output_dir = PathBuf::from(merged.output.as_deref().unwrap_or("."));
    let log = RunLog::new(output_dir.join(naming::log_file_name(Local::now().date_naive())));

    // The single recovery boundary: anything the pack steps did not swallow
    // themselves lands here with full detail in the run log, and the
    // operator gets one generic notice.
    match packaging::run_bundle_sync(&merged, &log) {
        Ok(outcome) => {
            let name = outcome
                .archive_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| outcome.archive_path.display().to_string());
            println!(
                "The Crash Diagnostics Tool has finished running! \
                 Send the following file to the developers who requested you to run it:\n\n{name}"
            );
        }
        Err(err) => {
            log.error(&format!("{err:#}"));
            eprintln!(
                "Could not pack diagnostic data. Please send the developers the Diagnostics Log file."
            );
            process::exit(1);
        }
    }
}

/// Reads environment variables prefixed with CRASHDIAG_
fn read_env() -> Config {
    let mut cfg = Config::default();
    let vars: HashMap<String, String> = env::vars().collect();

    macro_rules! get_env {
        ($key:expr) => {
            vars.get(&format!("CRASHDIAG_{}", $key)).cloned()
        };
    }

    cfg.output = get_env!("OUTPUT");
    cfg.config = get_env!("CONFIG");
    cfg.game_dir = get_env!("GAME_DIR");
    cfg.settings_file = get_env!("SETTINGS_FILE");
    cfg.dxdiag = get_env!("DXDIAG");
    cfg.max_attempts = get_env!("MAX_ATTEMPTS").and_then(|v| v.parse().ok());
    cfg.non_interactive = get_env!("NON_INTERACTIVE")
        .map(|v| v == "true" || v == "1" || v.eq_ignore_ascii_case("yes"));
    cfg.compress =
        get_env!("COMPRESS").map(|v| v == "true" || v == "1" || v.eq_ignore_ascii_case("yes"));
    cfg
}

/// Reads YAML or JSON config from file
fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)?;
    let lower = path.to_lowercase();
    let cfg = if lower.ends_with(".json") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(cfg)
}

/// Converts CLI struct into Config
fn cli_to_config(cli: &Cli) -> Config {
    Config {
        output: cli.output.clone(),
        config: cli.config.clone(),
        game_dir: cli.game_dir.clone(),
        settings_file: cli.settings_file.clone(),
        dxdiag: cli.dxdiag.clone(),
        max_attempts: cli.max_attempts,
        non_interactive: if cli.non_interactive { Some(true) } else { None },
        compress: if cli.store { Some(false) } else { None },
    }
}

/// Merge configs by priority: env < file < cli
fn merge_configs(env: Config, file: Config, cli: Config) -> Config {
    fn pick<T: Clone>(env: Option<T>, file: Option<T>, cli: Option<T>) -> Option<T> {
        cli.or(file).or(env)
    }

    Config {
        output: pick(env.output, file.output, cli.output),
        config: pick(env.config, file.config, cli.config),
        game_dir: pick(env.game_dir, file.game_dir, cli.game_dir),
        settings_file: pick(env.settings_file, file.settings_file, cli.settings_file),
        dxdiag: pick(env.dxdiag, file.dxdiag, cli.dxdiag),
        max_attempts: pick(env.max_attempts, file.max_attempts, cli.max_attempts),
        non_interactive: pick(env.non_interactive, file.non_interactive, cli.non_interactive),
        compress: pick(env.compress, file.compress, cli.compress),
    }
}
