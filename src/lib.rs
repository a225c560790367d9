//! Character-level SMILES codec and evaluation helpers for molecular
//! generative models.
//!
//! A [`Vocabulary`] is built once from the training corpus, sequences are
//! encoded to fixed-length code vectors and decoded back, and every decoded
//! batch is scored by a [`ValidityOracle`] and summarized by
//! [`compute_results`]. The [`reward`] module holds the shaping functions
//! used to turn raw metrics into bounded rewards.
//!
//! With the `python` feature the crate builds as a Python extension module.

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod oracle;
pub mod parser;
pub mod report;
pub mod results;
pub mod reward;
pub mod vocabulary;

#[cfg(feature = "python")]
mod python;

pub use config::EvalConfig;
pub use error::{Error, Result};
pub use io::{load_train_data, save_smi, ArtifactStore, SmiStore};
pub use oracle::ValidityOracle;
pub use parser::{AtomwiseParser, StructureParser};
pub use report::{print_results, render_summary};
pub use results::{compute_results, EvalResults, Evaluation};
pub use reward::Shaped;
pub use vocabulary::{build_vocab, Vocabulary};

/// A vocabulary bound to a fixed sequence length.
///
/// This is the object a training loop keeps around: it encodes the corpus
/// once up front and decodes every generated batch at evaluation time.
#[cfg_attr(feature = "python", pyo3::pyclass(module = "rustmoleval"))]
#[derive(Debug, Clone)]
pub struct SmilesCodec {
    vocab: Vocabulary,
    max_len: usize,
}

impl SmilesCodec {
    pub fn new(vocab: Vocabulary, max_len: usize) -> Self {
        Self { vocab, max_len }
    }

    /// Build the vocabulary from `corpus` using the configured characters.
    pub fn from_corpus<I, S>(corpus: I, config: &EvalConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vocab = Vocabulary::build(corpus, config.pad_char, config.start_char)?;
        Ok(Self::new(vocab, config.max_len))
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn encode(&self, smiles: &str) -> Result<Vec<u32>> {
        codec::encode(smiles, self.max_len, &self.vocab)
    }

    pub fn decode(&self, codes: &[u32]) -> Result<String> {
        codec::decode(codes, &self.vocab)
    }

    pub fn batch_encode<S: AsRef<str> + Sync>(&self, smiles_list: &[S]) -> Result<Vec<Vec<u32>>> {
        codec::batch_encode(smiles_list, self.max_len, &self.vocab)
    }

    pub fn batch_decode<C: AsRef<[u32]> + Sync>(&self, codes_list: &[C]) -> Result<Vec<String>> {
        codec::batch_decode(codes_list, &self.vocab)
    }

    /// Evaluate a batch of generated code sequences; see [`compute_results`].
    pub fn evaluate<C, S, P, A>(
        &self,
        model_samples: &[C],
        train_data: &[S],
        oracle: &ValidityOracle<P>,
        results: EvalResults,
        store: &A,
    ) -> Result<Evaluation>
    where
        C: AsRef<[u32]> + Sync,
        S: AsRef<str>,
        P: StructureParser,
        A: ArtifactStore + ?Sized,
    {
        compute_results(model_samples, train_data, &self.vocab, oracle, results, store)
    }
}
