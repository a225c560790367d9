//! Per-batch aggregation of decoded model outputs.

use ahash::AHashSet;
use rayon::prelude::*;

use crate::codec::batch_decode;
use crate::config::EvalConfig;
use crate::constants::DEFAULT_EXPERIMENT_NAME;
use crate::error::Result;
use crate::io::ArtifactStore;
use crate::oracle::ValidityOracle;
use crate::parser::StructureParser;
use crate::vocabulary::Vocabulary;

/// Summary statistics for one evaluation batch.
///
/// Set `batch` (and usually `exp_name`) to have the decoded batch persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalResults {
    pub mean_length: f64,
    pub n_samples: usize,
    pub uniq_samples: usize,
    pub good_samples: usize,
    pub bad_samples: usize,
    /// Verified samples that do not occur in the training data
    pub novel_samples: usize,
    pub exp_name: Option<String>,
    pub batch: Option<u64>,
    /// Name of the persisted batch artifact, if one was written
    pub model_samples: Option<String>,
}

impl EvalResults {
    /// Fresh record that persists the batch as `<exp_name>_<batch>`.
    pub fn for_batch(exp_name: impl Into<String>, batch: u64) -> Self {
        Self {
            exp_name: Some(exp_name.into()),
            batch: Some(batch),
            ..Self::default()
        }
    }

    /// Fresh record carrying the configured experiment name.
    pub fn from_config(config: &EvalConfig, batch: Option<u64>) -> Self {
        Self {
            exp_name: config.exp_name.clone(),
            batch,
            ..Self::default()
        }
    }

    fn artifact_name(&self, batch: u64) -> String {
        let exp_name = self.exp_name.as_deref().unwrap_or(DEFAULT_EXPERIMENT_NAME);
        format!("{}_{}", exp_name, batch)
    }
}

/// Aggregated results plus the partitioned samples, in batch order.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub results: EvalResults,
    pub verified: Vec<String>,
    pub unverified: Vec<String>,
}

/// Decode a batch of model outputs and compute its summary statistics.
///
/// `results` is consumed and returned filled in; start every batch from a
/// fresh record. Validity is checked in parallel, the partition itself is
/// built afterwards on the calling thread so both lists keep batch order.
pub fn compute_results<C, S, P, A>(
    model_samples: &[C],
    train_data: &[S],
    vocab: &Vocabulary,
    oracle: &ValidityOracle<P>,
    mut results: EvalResults,
    store: &A,
) -> Result<Evaluation>
where
    C: AsRef<[u32]> + Sync,
    S: AsRef<str>,
    P: StructureParser,
    A: ArtifactStore + ?Sized,
{
    let samples = batch_decode(model_samples, vocab)?;

    let total_len: usize = samples.iter().map(|s| s.chars().count()).sum();
    results.n_samples = samples.len();
    results.mean_length = if samples.is_empty() {
        0.0
    } else {
        total_len as f64 / samples.len() as f64
    };
    results.uniq_samples = samples.iter().map(String::as_str).collect::<AHashSet<_>>().len();

    let flags: Vec<bool> = samples.par_iter().map(|s| oracle.is_valid(s)).collect();
    let mut verified = Vec::new();
    let mut unverified = Vec::new();
    for (sample, valid) in samples.iter().zip(flags) {
        if valid {
            verified.push(sample.clone());
        } else {
            unverified.push(sample.clone());
        }
    }
    results.good_samples = verified.len();
    results.bad_samples = unverified.len();

    let train: AHashSet<&str> = train_data.iter().map(|s| s.as_ref()).collect();
    results.novel_samples = verified
        .iter()
        .filter(|s| !train.contains(s.as_str()))
        .count();

    if let Some(batch) = results.batch {
        let name = results.artifact_name(batch);
        store.save(&name, &samples)?;
        log::debug!("Persisted batch {} as {}", batch, name);
        results.model_samples = Some(name);
    }

    if samples.is_empty() {
        log::warn!("Empty batch: nothing to evaluate");
    }
    log::info!(
        "Evaluated {} samples: {} unique, {} verified, {} unverified",
        results.n_samples,
        results.uniq_samples,
        results.good_samples,
        results.bad_samples
    );

    Ok(Evaluation {
        results,
        verified,
        unverified,
    })
}
