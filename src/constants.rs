//! Constants and type aliases shared across the evaluation pipeline.

/// SMILES atom-level tokenization regex pattern
/// Matches:
/// - Bracketed atoms: [C@@H], [nH], [O-], etc.
/// - Two-char elements: Br, Cl (must come before B, C)
/// - Single-char elements: C, N, O, S, P, F, I, B
/// - Aromatic atoms: b, c, n, o, s, p
/// - Bonds: =, #, -, :, ~
/// - Stereochemistry: @, /, \
/// - Branches: (, )
/// - Disconnected: .
/// - Ring numbers: single digit or %XX
/// - Other: +, ?, >, *, $
pub const SMILES_ATOM_PATTERN: &str = r"(\[[^\]]+]|Br?|Cl?|N|O|S|P|F|I|b|c|n|o|s|p|\(|\)|\.|=|#|-|\+|\\|\/|:|~|@|\?|>|\*|\$|\%[0-9]{2}|[0-9])";

/// Default padding character appended to short sequences.
pub const DEFAULT_PAD_CHAR: char = '_';

/// Default start character, always assigned code 0.
pub const DEFAULT_START_CHAR: char = '^';

/// Code reserved for the start character.
pub const START_CODE: u32 = 0;

/// Default width of the Gaussian shoulders in the shaping functions.
pub const DEFAULT_DECAY: f64 = 0.025;

/// Directory that decoded batches are dumped into.
pub const ARTIFACT_DIR: &str = "epoch_data";

/// File extension used for decoded batch dumps and plain corpora.
pub const SMI_EXTENSION: &str = "smi";

/// File extension for tabular corpora.
pub const CSV_EXTENSION: &str = "csv";

/// Header of the column holding SMILES in a tabular corpus.
pub const SMILES_COLUMN: &str = "smiles";

/// Experiment name used for artifacts when none was configured.
pub const DEFAULT_EXPERIMENT_NAME: &str = "experiment";

/// Number of example samples printed per partition in the summary.
pub const REPORT_SAMPLE_LIMIT: usize = 10;
