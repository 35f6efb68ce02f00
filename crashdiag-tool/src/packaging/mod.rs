use anyhow::Result;
use tokio::runtime::Builder;

use crashdiag_lib::Config;

use crate::bundler::{self, BundleOutcome};
use crate::logger::RunLog;

pub mod zip;

/// Runs the whole bundling task, managing its own async runtime.
///
/// This is the main entrypoint for the synchronous CLI: the runtime exists
/// only to drive the archive writer, the task itself is one linear sequence.
pub fn run_bundle_sync(config: &Config, log: &RunLog) -> Result<BundleOutcome> {
    let rt = Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(bundler::run(config, log))
}
