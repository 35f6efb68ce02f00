use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub output: Option<String>,
    pub config: Option<String>,
    pub game_dir: Option<String>,
    pub settings_file: Option<String>,
    pub dxdiag: Option<String>,
    pub max_attempts: Option<u32>,
    pub non_interactive: Option<bool>,
    pub compress: Option<bool>,
}
