// crates/tidepool-runner/src/pipeline.rs
//
// The proof orchestrator. One run walks Init -> IdentityResolved ->
// {per file: Validate -> Score} -> Done and produces exactly one proof
// record. The run always completes: every degradation is visible only
// through the score, the validity flag, and the error-code list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use tidepool_core::{
    ErrorCode, IdentityProvider, IdentityRecord, InputPayload, PoolError, ProofRecord,
};
use tidepool_schema::classify;
use tidepool_scoring::ScoringEngine;

/// Drives one proof-of-contribution run.
pub struct ProofOrchestrator {
    identity: Arc<dyn IdentityProvider>,
    engine: ScoringEngine,
    pool_id: u64,
}

impl ProofOrchestrator {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        engine: ScoringEngine,
        pool_id: u64,
    ) -> Self {
        Self {
            identity,
            engine,
            pool_id,
        }
    }

    /// Process every candidate file under `input_dir` and return the
    /// completed proof record.
    ///
    /// One record exists per run; when several files score successfully the
    /// last one processed wins (documented last-write-wins, not a merge).
    pub async fn run(&self, input_dir: &Path) -> Result<ProofRecord, PoolError> {
        info!("starting proof generation for pool {}", self.pool_id);
        let mut record = ProofRecord::new(self.pool_id);

        // Identity is resolved exactly once per run, never per file.
        let identity = self.resolve_identity(&mut record).await;

        let files = candidate_files(input_dir)?;
        if files.is_empty() {
            warn!("no candidate data files in {}", input_dir.display());
        }

        for path in files {
            info!("checking file {}", path.display());

            let payload = match read_payload(&path) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("unreadable payload {}: {}", path.display(), e);
                    record.push_error(ErrorCode::InvalidSchema);
                    continue;
                }
            };

            let schema = classify(&payload);
            if !schema.matches {
                warn!(
                    "file {} does not match schema {}",
                    path.display(),
                    schema.schema_name
                );
                record.push_error(ErrorCode::InvalidSchema);
                continue;
            }

            let file_score = self.engine.score(&payload, &schema, identity.as_ref()).await;
            record.score = file_score.score;
            record.set_breakdown(&file_score.breakdown);
            record.attributes = file_score.attributes;
            record.metadata = file_score.metadata;
        }

        record.finalize();
        info!(score = record.score, valid = record.valid, "proof generation complete");
        Ok(record)
    }

    /// Resolve the run-level identity, recording error codes for the two
    /// degradations: no identity at all, and an unverified email.
    async fn resolve_identity(&self, record: &mut ProofRecord) -> Option<IdentityRecord> {
        match self.identity.resolve().await {
            Ok(Some(identity)) => {
                if !identity.email_verified {
                    warn!("identity resolved but its email is unverified");
                    record.push_error(ErrorCode::UnverifiedEmail);
                }
                info!("verified identity resolved for this run");
                Some(identity)
            }
            Ok(None) => {
                warn!("no verified identity for this run");
                record.push_error(ErrorCode::NoVerifiedIdentity);
                None
            }
            Err(e) => {
                // The check itself failed; for scoring this is the same
                // absence, but it is logged as a failure, not a rejection.
                warn!("identity check failed: {}", e);
                record.push_error(ErrorCode::NoVerifiedIdentity);
                None
            }
        }
    }
}

/// Entries of `input_dir` with a recognized data extension, in sorted order
/// so repeated runs over the same directory process files identically.
fn candidate_files(input_dir: &Path) -> Result<Vec<PathBuf>, PoolError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        let is_data_file = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("json"));
        if is_data_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_payload(path: &Path) -> Result<InputPayload, PoolError> {
    let bytes = std::fs::read(path)?;
    InputPayload::from_slice(&bytes)
}
