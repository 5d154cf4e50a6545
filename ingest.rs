use std::path::Path;

use log::{error, warn};

use crate::config::Config;
use crate::error::Error;
use crate::merge::{self, MergeOutcome};
use crate::staging::Staging;
use crate::unpack;

// Per-stage counters, printed in each stage's summary line.
#[derive(Debug, Default)]
pub struct Tally {
    pub merged: usize,
    pub replaced: usize,
    pub duplicates: usize,
    pub failures: usize,
}

impl Tally {
    fn record(&mut self, outcome: &MergeOutcome) {
        match outcome {
            MergeOutcome::Placed(_) => self.merged += 1,
            MergeOutcome::Replaced(_) => self.replaced += 1,
            MergeOutcome::Identical => self.duplicates += 1,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} new, {} replaced, {} duplicates, {} failures",
            self.merged, self.replaced, self.duplicates, self.failures
        )
    }
}

// Merge one staged .vim file into the target directory. Merge errors are
// logged and counted; they never propagate past the file that caused them.
pub fn merge_candidate(path: &Path, config: &Config, tally: &mut Tally) {
    let base = match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem.to_string(),
        None => {
            warn!("skipping oddly named file {}", path.display());
            tally.failures += 1;
            return;
        }
    };
    match merge::merge_scheme(path, &base, &config.target_dir) {
        Ok(outcome) => tally.record(&outcome),
        Err(e) => {
            error!("{}", e);
            tally.failures += 1;
        }
    }
}

// Route one downloaded artifact: bare scheme files merge directly, known
// archive formats are unpacked and their candidates merged one by one.
// Anything else stays put in the staging directory for manual inspection.
pub fn ingest_artifact(artifact: &Path, staging: &Staging, config: &Config, tally: &mut Tally) {
    let name = match artifact.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => {
            warn!("skipping oddly named artifact {}", artifact.display());
            tally.failures += 1;
            return;
        }
    };

    if name.ends_with(".vim") {
        merge_candidate(artifact, config, tally);
        return;
    }

    let kind = match unpack::detect_kind(&name) {
        Some(kind) => kind,
        None => {
            error!(
                "{}",
                Error::UnrecognizedArtifact {
                    path: artifact.to_path_buf()
                }
            );
            tally.failures += 1;
            return;
        }
    };

    let dir = match staging.unpack_dir(&name) {
        Ok(dir) => dir,
        Err(e) => {
            error!("no extraction directory for {}: {}", name, e);
            tally.failures += 1;
            return;
        }
    };
    if let Err(e) = unpack::unpack(artifact, kind, &dir) {
        error!("{}", e);
        tally.failures += 1;
        return;
    }

    let candidates = unpack::collect_candidates(&dir);
    if candidates.is_empty() {
        warn!("{} contained no color scheme files", name);
        return;
    }
    for candidate in candidates {
        merge_candidate(&candidate, config, tally);
    }
}
