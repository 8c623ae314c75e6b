// crates/tidepool-runner/src/output.rs
//
// Writes the completed proof record for the external publisher to pick up.

use std::path::{Path, PathBuf};

use tracing::info;

use tidepool_core::{PoolError, ProofRecord};

/// File name the publisher expects inside the output directory.
const PROOF_FILE_NAME: &str = "proof.json";

/// Serialize the proof record to `<output_dir>/proof.json`.
pub fn write_proof(record: &ProofRecord, output_dir: &Path) -> Result<PathBuf, PoolError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(PROOF_FILE_NAME);
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(&path, json)?;
    info!("proof record written to {}", path.display());
    Ok(path)
}
