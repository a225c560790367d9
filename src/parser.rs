//! Structure parsing capability used by the validity oracle.
//!
//! [`StructureParser`] is the boundary to whatever decides that a string
//! denotes a molecule. [`AtomwiseParser`] is a purely syntactic
//! implementation built on the atom-level SMILES regex; it checks token
//! coverage, branch balance and ring closure pairing, and knows nothing about
//! valence or aromaticity.

use ahash::AHashSet;
use compact_str::CompactString;
use fancy_regex::Regex;

use crate::constants::SMILES_ATOM_PATTERN;

/// Opaque structure-parsing capability.
///
/// `parse` returns `None` for anything that is not a structure; it must not
/// panic on malformed input.
pub trait StructureParser: Send + Sync {
    type Structure;

    fn parse(&self, smiles: &str) -> Option<Self::Structure>;

    fn atom_count(&self, structure: &Self::Structure) -> usize;

    fn canonicalize(&self, smiles: &str) -> Option<String>;
}

/// Tokenize a SMILES string into atom-level tokens.
///
/// Splits a SMILES string into its constituent atoms and tokens using a regex pattern.
/// Handles multi-character atoms (Br, Cl), bracket atoms ([C@@H], [N+]), ring closures,
/// bonds, and stereochemistry markers. Characters the pattern does not know are skipped.
pub fn atomwise_tokenize(smiles: &str, pattern: &Regex) -> Vec<CompactString> {
    let mut tokens = Vec::new();
    for m in pattern.find_iter(smiles).flatten() {
        tokens.push(CompactString::from(m.as_str()));
    }
    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Atom,
    Bond,
    BranchOpen,
    BranchClose,
    Dot,
    Ring,
    Other,
}

fn classify(token: &str) -> TokenKind {
    match token {
        t if t.starts_with('[') => TokenKind::Atom,
        "B" | "Br" | "C" | "Cl" | "N" | "O" | "S" | "P" | "F" | "I" => TokenKind::Atom,
        "b" | "c" | "n" | "o" | "s" | "p" | "*" => TokenKind::Atom,
        "=" | "#" | "-" | ":" | "~" | "/" | "\\" => TokenKind::Bond,
        "(" => TokenKind::BranchOpen,
        ")" => TokenKind::BranchClose,
        "." => TokenKind::Dot,
        t if t.starts_with('%') || t.chars().all(|c| c.is_ascii_digit()) => TokenKind::Ring,
        _ => TokenKind::Other,
    }
}

/// A syntactically well-formed SMILES string split into atom-level tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Molecule {
    tokens: Vec<CompactString>,
    atoms: usize,
}

impl Molecule {
    pub fn tokens(&self) -> &[CompactString] {
        &self.tokens
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms
    }

    pub fn to_smiles(&self) -> String {
        self.tokens.iter().map(|t| t.as_str()).collect()
    }
}

/// Syntactic SMILES parser driven by [`SMILES_ATOM_PATTERN`].
#[derive(Debug, Clone)]
pub struct AtomwiseParser {
    compiled_pattern: Regex,
}

impl Default for AtomwiseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomwiseParser {
    pub fn new() -> Self {
        Self {
            compiled_pattern: Regex::new(SMILES_ATOM_PATTERN).expect("Invalid SMILES pattern"),
        }
    }

    pub fn tokenize(&self, smiles: &str) -> Vec<CompactString> {
        atomwise_tokenize(smiles, &self.compiled_pattern)
    }

    fn check(&self, smiles: &str) -> Option<Molecule> {
        let tokens = self.tokenize(smiles);

        // Matches are ordered and disjoint, so equal length means full coverage.
        let covered: usize = tokens.iter().map(|t| t.len()).sum();
        if covered != smiles.len() {
            return None;
        }

        let mut atoms = 0usize;
        let mut depth = 0usize;
        let mut open_rings: AHashSet<&str> = AHashSet::new();
        let mut prev: Option<TokenKind> = None;

        for token in &tokens {
            let kind = classify(token);
            let ok = match kind {
                TokenKind::Atom => {
                    atoms += 1;
                    true
                }
                TokenKind::Bond => matches!(
                    prev,
                    Some(TokenKind::Atom | TokenKind::Ring | TokenKind::BranchOpen | TokenKind::BranchClose)
                ),
                TokenKind::BranchOpen => {
                    depth += 1;
                    matches!(prev, Some(TokenKind::Atom | TokenKind::Ring | TokenKind::BranchClose))
                }
                TokenKind::BranchClose => {
                    let closable = depth > 0
                        && matches!(prev, Some(TokenKind::Atom | TokenKind::Ring | TokenKind::BranchClose));
                    depth = depth.saturating_sub(1);
                    closable
                }
                TokenKind::Dot => matches!(
                    prev,
                    Some(TokenKind::Atom | TokenKind::Ring | TokenKind::BranchClose)
                ),
                TokenKind::Ring => {
                    if !open_rings.remove(token.as_str()) {
                        open_rings.insert(token.as_str());
                    }
                    matches!(prev, Some(TokenKind::Atom | TokenKind::Ring | TokenKind::Bond))
                }
                TokenKind::Other => false,
            };
            if !ok {
                return None;
            }
            prev = Some(kind);
        }

        let terminated = matches!(
            prev,
            Some(TokenKind::Atom | TokenKind::Ring | TokenKind::BranchClose)
        );
        if atoms == 0 || depth != 0 || !open_rings.is_empty() || !terminated {
            return None;
        }

        Some(Molecule { tokens, atoms })
    }
}

impl StructureParser for AtomwiseParser {
    type Structure = Molecule;

    fn parse(&self, smiles: &str) -> Option<Molecule> {
        self.check(smiles)
    }

    fn atom_count(&self, structure: &Molecule) -> usize {
        structure.num_atoms()
    }

    fn canonicalize(&self, smiles: &str) -> Option<String> {
        self.check(smiles).map(|mol| mol.to_smiles())
    }
}
