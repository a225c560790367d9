//! Python bindings.
//!
//! Validity helpers take an optional `parser` callable (for example RDKit's
//! `Chem.MolFromSmiles`). It is called with a SMILES string and must return a
//! molecule object exposing `GetNumAtoms()`, or `None`. Exceptions raised by
//! the parser count as "invalid". Without a callable the built-in syntactic
//! parser is used.

use std::collections::HashMap;
use std::path::PathBuf;

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::constants::{ARTIFACT_DIR, DEFAULT_DECAY};
use crate::error::Error;
use crate::oracle::ValidityOracle;
use crate::parser::{AtomwiseParser, StructureParser};
use crate::results::{compute_results, EvalResults};
use crate::reward::{self, Shaped};
use crate::vocabulary::Vocabulary;
use crate::{codec, io, report, SmilesCodec};

impl From<Error> for PyErr {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => PyIOError::new_err(e.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

// ------------------------ Parser adapters ------------------------

/// Structure parser backed by Python callables.
struct PyParser {
    parse: Py<PyAny>,
    to_smiles: Option<Py<PyAny>>,
}

impl StructureParser for PyParser {
    type Structure = Py<PyAny>;

    fn parse(&self, smiles: &str) -> Option<Py<PyAny>> {
        Python::attach(|py| match self.parse.bind(py).call1((smiles,)) {
            Ok(mol) if !mol.is_none() => Some(mol.unbind()),
            Ok(_) => None,
            Err(err) => {
                log::debug!("Parser raised on {:?}: {}", smiles, err);
                None
            }
        })
    }

    fn atom_count(&self, structure: &Py<PyAny>) -> usize {
        Python::attach(|py| {
            structure
                .bind(py)
                .call_method0("GetNumAtoms")
                .and_then(|n| n.extract::<usize>())
                .unwrap_or(0)
        })
    }

    fn canonicalize(&self, smiles: &str) -> Option<String> {
        let to_smiles = self.to_smiles.as_ref()?;
        let mol = self.parse(smiles)?;
        Python::attach(|py| {
            to_smiles
                .bind(py)
                .call1((mol.bind(py),))
                .and_then(|s| s.extract::<String>())
                .ok()
        })
    }
}

/// Oracle over whichever parser the caller picked.
enum PyOracle {
    Atomwise(ValidityOracle<AtomwiseParser>),
    Callable(ValidityOracle<PyParser>),
}

impl PyOracle {
    fn new(parser: Option<Bound<'_, PyAny>>, to_smiles: Option<Bound<'_, PyAny>>) -> Self {
        match parser {
            Some(parse) => PyOracle::Callable(ValidityOracle::new(PyParser {
                parse: parse.unbind(),
                to_smiles: to_smiles.map(Bound::unbind),
            })),
            None => PyOracle::Atomwise(ValidityOracle::new(AtomwiseParser::new())),
        }
    }

    fn is_valid(&self, smiles: &str) -> bool {
        match self {
            PyOracle::Atomwise(oracle) => oracle.is_valid(smiles),
            PyOracle::Callable(oracle) => oracle.is_valid(smiles),
        }
    }

    fn is_valid_and_short(&self, smiles: &str, max_len: usize) -> bool {
        match self {
            PyOracle::Atomwise(oracle) => oracle.is_valid_and_short(smiles, max_len),
            PyOracle::Callable(oracle) => oracle.is_valid_and_short(smiles, max_len),
        }
    }

    fn filter_valid(&self, smiles: Vec<String>) -> Vec<String> {
        match self {
            PyOracle::Atomwise(oracle) => oracle.filter_valid(smiles).collect(),
            PyOracle::Callable(oracle) => oracle.filter_valid(smiles).collect(),
        }
    }

    fn canonicalize(&self, smiles: &str) -> Option<String> {
        match self {
            PyOracle::Atomwise(oracle) => oracle.canonicalize(smiles),
            PyOracle::Callable(oracle) => oracle.canonicalize(smiles),
        }
    }
}

// ------------------------ SmilesCodec ------------------------

/// Methods for the SmilesCodec class exposed to Python.
#[pymethods]
impl SmilesCodec {
    /// Build the vocabulary from a list of SMILES.
    ///
    /// # Arguments
    /// * `smiles` - Training corpus
    /// * `max_len` - Fixed length of encoded sequences
    /// * `pad_char` - Padding character, `_` by default
    /// * `start_char` - Character reserved for code 0, `^` by default
    #[new]
    #[pyo3(signature = (smiles, max_len, pad_char='_', start_char='^'))]
    fn py_new(smiles: Vec<String>, max_len: usize, pad_char: char, start_char: char) -> PyResult<Self> {
        let vocab = Vocabulary::build(&smiles, pad_char, start_char)?;
        Ok(Self::new(vocab, max_len))
    }

    #[getter(max_len)]
    fn py_max_len(&self) -> usize {
        self.max_len()
    }

    #[getter]
    fn vocab_size(&self) -> usize {
        self.vocab().len()
    }

    #[getter]
    fn pad_char(&self) -> char {
        self.vocab().pad_char()
    }

    #[getter]
    fn start_char(&self) -> char {
        self.vocab().start_char()
    }

    #[getter]
    fn pad_code(&self) -> u32 {
        self.vocab().pad_code()
    }

    /// Return the vocabulary as (char, code) tuples in code order.
    fn get_vocabulary(&self) -> Vec<(char, u32)> {
        self.vocab().entries().collect()
    }

    /// Code for a single character.
    fn char_to_code(&self, c: char) -> PyResult<u32> {
        Ok(self.vocab().code_of(c).ok_or(Error::UnknownChar(c))?)
    }

    /// Character for a single code.
    fn code_to_char(&self, code: u32) -> PyResult<char> {
        Ok(self.vocab().char_of(code).ok_or(Error::UnknownCode(code))?)
    }

    /// Encode a SMILES string padded to `max_len`.
    #[pyo3(name = "encode")]
    fn py_encode(&self, smiles: &str) -> PyResult<Vec<u32>> {
        Ok(self.encode(smiles)?)
    }

    /// Decode codes back to a SMILES string without padding.
    #[pyo3(name = "decode")]
    fn py_decode(&self, codes: Vec<u32>) -> PyResult<String> {
        Ok(self.decode(&codes)?)
    }

    /// Encode multiple SMILES strings in parallel.
    #[pyo3(name = "batch_encode")]
    fn py_batch_encode(&self, py: Python<'_>, smiles_list: Vec<String>) -> PyResult<Vec<Vec<u32>>> {
        Ok(py.detach(|| self.batch_encode(&smiles_list))?)
    }

    /// Decode multiple code sequences in parallel.
    #[pyo3(name = "batch_decode")]
    fn py_batch_decode(&self, py: Python<'_>, codes_list: Vec<Vec<u32>>) -> PyResult<Vec<String>> {
        Ok(py.detach(|| self.batch_decode(&codes_list))?)
    }

    fn __len__(&self) -> usize {
        self.vocab().len()
    }

    fn __repr__(&self) -> String {
        format!(
            "SmilesCodec(vocab_size={}, max_len={})",
            self.vocab().len(),
            self.max_len()
        )
    }
}

// ------------------------ Codec functions ------------------------

/// Build the (char -> code, code -> char) dictionaries from a corpus.
#[pyfunction]
#[pyo3(name = "build_vocab", signature = (smiles, pad_char='_', start_char='^'))]
fn build_vocab_py(
    smiles: Vec<String>,
    pad_char: char,
    start_char: char,
) -> PyResult<(HashMap<char, u32>, HashMap<u32, char>)> {
    let vocab = Vocabulary::build(&smiles, pad_char, start_char)?;
    let char_dict = vocab.entries().collect();
    let ord_dict = vocab.entries().map(|(c, code)| (code, c)).collect();
    Ok((char_dict, ord_dict))
}

#[pyfunction]
#[pyo3(name = "pad", signature = (smiles, n, pad_char='_'))]
fn pad_py(smiles: &str, n: usize, pad_char: char) -> String {
    codec::pad(smiles, n, pad_char).into_owned()
}

#[pyfunction]
#[pyo3(name = "unpad", signature = (smiles, pad_char='_'))]
fn unpad_py(smiles: &str, pad_char: char) -> String {
    codec::unpad(smiles, pad_char).to_string()
}

/// Tokenize a SMILES string into atom-level tokens.
#[pyfunction]
#[pyo3(name = "atomwise_tokenize")]
fn atomwise_tokenize_py(smiles: &str) -> Vec<String> {
    let parser = AtomwiseParser::new();
    parser.tokenize(smiles).into_iter().map(|s| s.to_string()).collect()
}

// ------------------------ Reward shaping ------------------------

#[derive(FromPyObject)]
enum ShapedArg {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl From<ShapedArg> for Shaped {
    fn from(arg: ShapedArg) -> Self {
        match arg {
            ShapedArg::Scalar(x) => Shaped::Scalar(x),
            ShapedArg::Sequence(xs) => Shaped::Sequence(xs),
        }
    }
}

fn shaped_to_py(py: Python<'_>, shaped: Shaped) -> PyResult<Py<PyAny>> {
    match shaped {
        Shaped::Scalar(x) => Ok(x.into_pyobject(py)?.into_any().unbind()),
        Shaped::Sequence(xs) => Ok(xs.into_pyobject(py)?.into_any().unbind()),
    }
}

#[pyfunction]
#[pyo3(name = "gauss_remap")]
fn gauss_remap_py(py: Python<'_>, x: ShapedArg, x_mean: f64, x_std: f64) -> PyResult<Py<PyAny>> {
    let shaped = Shaped::from(x).map(|v| reward::gauss_remap(v, x_mean, x_std));
    shaped_to_py(py, shaped)
}

#[pyfunction]
#[pyo3(name = "remap")]
fn remap_py(py: Python<'_>, x: ShapedArg, x_min: f64, x_max: f64) -> PyResult<Py<PyAny>> {
    let shaped = Shaped::from(x).map(|v| reward::remap(v, x_min, x_max));
    shaped_to_py(py, shaped)
}

#[pyfunction]
#[pyo3(name = "constant_range")]
fn constant_range_py(py: Python<'_>, x: ShapedArg, x_low: f64, x_high: f64) -> PyResult<Py<PyAny>> {
    let shaped = Shaped::from(x).map(|v| reward::constant_range(v, x_low, x_high));
    shaped_to_py(py, shaped)
}

#[pyfunction]
#[pyo3(name = "constant_bump", signature = (x, x_low, x_high, decay=DEFAULT_DECAY))]
fn constant_bump_py(
    py: Python<'_>,
    x: ShapedArg,
    x_low: f64,
    x_high: f64,
    decay: f64,
) -> PyResult<Py<PyAny>> {
    let shaped = Shaped::from(x).map(|v| reward::constant_bump(v, x_low, x_high, decay));
    shaped_to_py(py, shaped)
}

#[pyfunction]
#[pyo3(name = "smooth_plateau", signature = (x, x_point, decay=DEFAULT_DECAY, increase=true))]
fn smooth_plateau_py(
    py: Python<'_>,
    x: ShapedArg,
    x_point: f64,
    decay: f64,
    increase: bool,
) -> PyResult<Py<PyAny>> {
    let shaped = Shaped::from(x).map(|v| reward::smooth_plateau(v, x_point, decay, increase));
    shaped_to_py(py, shaped)
}

/// len(a) / len(b), 0 when b is empty.
#[pyfunction]
#[pyo3(name = "pct")]
fn pct_py(a: &Bound<'_, PyAny>, b: &Bound<'_, PyAny>) -> PyResult<f64> {
    Ok(reward::ratio(a.len()?, b.len()?))
}

// ------------------------ Validity ------------------------

#[pyfunction]
#[pyo3(signature = (smiles, parser=None))]
fn verify_sequence(smiles: &str, parser: Option<Bound<'_, PyAny>>) -> bool {
    PyOracle::new(parser, None).is_valid(smiles)
}

#[pyfunction]
#[pyo3(signature = (smiles, max_len, parser=None))]
fn verified_and_below(smiles: &str, max_len: usize, parser: Option<Bound<'_, PyAny>>) -> bool {
    PyOracle::new(parser, None).is_valid_and_short(smiles, max_len)
}

#[pyfunction]
#[pyo3(signature = (smiles, parser=None))]
fn filter_smiles(smiles: Vec<String>, parser: Option<Bound<'_, PyAny>>) -> Vec<String> {
    PyOracle::new(parser, None).filter_valid(smiles)
}

/// Canonical form of `smiles`, or None when it does not parse.
///
/// A Python `parser` must come with `to_smiles` (e.g. `Chem.MolToSmiles`),
/// which writes the parsed molecule back out.
#[pyfunction]
#[pyo3(signature = (smiles, parser=None, to_smiles=None))]
fn canon_smile(
    smiles: &str,
    parser: Option<Bound<'_, PyAny>>,
    to_smiles: Option<Bound<'_, PyAny>>,
) -> PyResult<Option<String>> {
    if parser.is_some() && to_smiles.is_none() {
        return Err(PyValueError::new_err(
            "canon_smile needs `to_smiles` when a `parser` is given",
        ));
    }
    Ok(PyOracle::new(parser, to_smiles).canonicalize(smiles))
}

/// Return `fun(structure)` when `smiles` is valid, else `default`.
///
/// The structure is the parser's molecule object, or the list of atom-level
/// tokens for the built-in parser. Extra keyword arguments go to `fun`.
/// Errors raised by `fun` propagate.
#[pyfunction]
#[pyo3(signature = (smiles, fun, parser=None, default=0.0, **kwargs))]
fn apply_to_valid(
    py: Python<'_>,
    smiles: &str,
    fun: Bound<'_, PyAny>,
    parser: Option<Bound<'_, PyAny>>,
    default: f64,
    kwargs: Option<&Bound<'_, PyDict>>,
) -> PyResult<Py<PyAny>> {
    let fallback = default.into_pyobject(py)?.into_any().unbind();
    match PyOracle::new(parser, None) {
        PyOracle::Atomwise(oracle) => oracle.apply_if_valid(
            smiles,
            |mol| {
                let tokens: Vec<&str> = mol.tokens().iter().map(|t| t.as_str()).collect();
                fun.call((tokens,), kwargs).map(Bound::unbind)
            },
            Ok(fallback),
        ),
        PyOracle::Callable(oracle) => oracle.apply_if_valid(
            smiles,
            |mol| fun.call((mol.bind(py),), kwargs).map(Bound::unbind),
            Ok(fallback),
        ),
    }
}

// ------------------------ I/O and results ------------------------

#[pyfunction]
#[pyo3(name = "load_train_data")]
fn load_train_data_py(filename: PathBuf) -> PyResult<Vec<String>> {
    Ok(io::load_train_data(filename)?)
}

#[pyfunction]
#[pyo3(name = "save_smi", signature = (name, smiles, directory=PathBuf::from(ARTIFACT_DIR)))]
fn save_smi_py(name: &str, smiles: Vec<String>, directory: PathBuf) -> PyResult<PathBuf> {
    Ok(io::save_smi(directory, name, &smiles)?)
}

/// Decode a batch, score it and return the summary as a dict.
///
/// When `batch` is given the decoded batch is written to
/// `<artifact_dir>/<exp_name>_<batch>.smi`.
#[pyfunction]
#[pyo3(name = "compute_results", signature = (
    model_samples, train_data, codec, exp_name=None, batch=None,
    artifact_dir=PathBuf::from(ARTIFACT_DIR), verbose=true, parser=None
))]
#[allow(clippy::too_many_arguments)]
fn compute_results_py<'py>(
    py: Python<'py>,
    model_samples: Vec<Vec<u32>>,
    train_data: Vec<String>,
    codec: PyRef<'py, SmilesCodec>,
    exp_name: Option<String>,
    batch: Option<u64>,
    artifact_dir: PathBuf,
    verbose: bool,
    parser: Option<Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyDict>> {
    let vocab = codec.vocab();
    let oracle = PyOracle::new(parser, None);
    let store = io::SmiStore::new(artifact_dir);
    let record = EvalResults {
        exp_name,
        batch,
        ..EvalResults::default()
    };

    let eval = py.detach(|| match &oracle {
        PyOracle::Atomwise(o) => compute_results(&model_samples, &train_data, vocab, o, record, &store),
        PyOracle::Callable(o) => compute_results(&model_samples, &train_data, vocab, o, record, &store),
    })?;

    if verbose {
        report::print_results(&eval);
    }

    let r = eval.results;
    let dict = PyDict::new(py);
    dict.set_item("mean_length", r.mean_length)?;
    dict.set_item("n_samples", r.n_samples)?;
    dict.set_item("uniq_samples", r.uniq_samples)?;
    dict.set_item("good_samples", r.good_samples)?;
    dict.set_item("bad_samples", r.bad_samples)?;
    dict.set_item("novel_samples", r.novel_samples)?;
    dict.set_item("exp_name", r.exp_name)?;
    dict.set_item("Batch", r.batch)?;
    dict.set_item("model_samples", r.model_samples)?;
    Ok(dict)
}

/// SMILES codec and evaluation helpers for molecular generative models
#[pymodule]
fn rustmoleval(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();
    m.add_class::<SmilesCodec>()?;
    m.add_function(wrap_pyfunction!(build_vocab_py, m)?)?;
    m.add_function(wrap_pyfunction!(pad_py, m)?)?;
    m.add_function(wrap_pyfunction!(unpad_py, m)?)?;
    m.add_function(wrap_pyfunction!(atomwise_tokenize_py, m)?)?;
    m.add_function(wrap_pyfunction!(gauss_remap_py, m)?)?;
    m.add_function(wrap_pyfunction!(remap_py, m)?)?;
    m.add_function(wrap_pyfunction!(constant_range_py, m)?)?;
    m.add_function(wrap_pyfunction!(constant_bump_py, m)?)?;
    m.add_function(wrap_pyfunction!(smooth_plateau_py, m)?)?;
    m.add_function(wrap_pyfunction!(pct_py, m)?)?;
    m.add_function(wrap_pyfunction!(verify_sequence, m)?)?;
    m.add_function(wrap_pyfunction!(verified_and_below, m)?)?;
    m.add_function(wrap_pyfunction!(filter_smiles, m)?)?;
    m.add_function(wrap_pyfunction!(canon_smile, m)?)?;
    m.add_function(wrap_pyfunction!(apply_to_valid, m)?)?;
    m.add_function(wrap_pyfunction!(load_train_data_py, m)?)?;
    m.add_function(wrap_pyfunction!(save_smi_py, m)?)?;
    m.add_function(wrap_pyfunction!(compute_results_py, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        Python::initialize();

        Python::attach(|py| {
            let err: PyErr = Error::UnknownChar('Z').into();
            assert!(err.is_instance_of::<PyValueError>(py));

            let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
            let err: PyErr = Error::Io(io).into();
            assert!(err.is_instance_of::<PyIOError>(py));
        });
    }

    #[test]
    fn test_shaped_arg_dispatch() {
        Python::initialize();

        Python::attach(|py| {
            let scalar = constant_range_py(py, ShapedArg::Scalar(5.0), 0.0, 10.0).unwrap();
            assert_eq!(scalar.extract::<f64>(py).unwrap(), 1.0);

            let seq = constant_range_py(py, ShapedArg::Sequence(vec![0.0, 5.0, 10.0]), 0.0, 10.0)
                .unwrap();
            assert_eq!(seq.extract::<Vec<f64>>(py).unwrap(), vec![0.0, 1.0, 0.0]);
        });
    }

    #[test]
    fn test_python_parser_absorbs_exceptions() {
        Python::initialize();

        Python::attach(|py| {
            let raising = py
                .eval(c"lambda s: 1 // 0", None, None)
                .unwrap();
            let oracle = PyOracle::new(Some(raising), None);
            assert!(!oracle.is_valid("CCO"));

            let returns_none = py.eval(c"lambda s: None", None, None).unwrap();
            let oracle = PyOracle::new(Some(returns_none), None);
            assert!(!oracle.is_valid("CCO"));
        });
    }

    #[test]
    fn test_canon_smile_requires_to_smiles() {
        Python::initialize();

        Python::attach(|py| {
            let parse = py.eval(c"lambda s: s", None, None).unwrap();
            let err = canon_smile("CCO", Some(parse.clone()), None).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));

            let upper = py.eval(c"lambda m: m.upper()", None, None).unwrap();
            // No GetNumAtoms is needed to canonicalize.
            let canon = canon_smile("cco", Some(parse), Some(upper)).unwrap();
            assert_eq!(canon.as_deref(), Some("CCO"));

            assert_eq!(canon_smile("C(", None, None).unwrap(), None);
        });
    }

    #[test]
    fn test_apply_to_valid_forwards_kwargs() {
        Python::initialize();

        Python::attach(|py| {
            let fun = py
                .eval(c"lambda toks, scale=1: len(toks) * scale", None, None)
                .unwrap();
            let kwargs = PyDict::new(py);
            kwargs.set_item("scale", 10).unwrap();

            let out = apply_to_valid(py, "CCO", fun.clone(), None, 0.0, Some(&kwargs)).unwrap();
            assert_eq!(out.extract::<i64>(py).unwrap(), 30);

            let out = apply_to_valid(py, "CCO", fun.clone(), None, 0.0, None).unwrap();
            assert_eq!(out.extract::<i64>(py).unwrap(), 3);

            let out = apply_to_valid(py, "C(", fun, None, -1.0, Some(&kwargs)).unwrap();
            assert_eq!(out.extract::<f64>(py).unwrap(), -1.0);
        });
    }
}
