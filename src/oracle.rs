//! Validity oracle over decoded samples.

use crate::parser::StructureParser;

/// Decides whether a string is a usable, non-trivial structure.
///
/// A string is valid when it is non-empty, the parser accepts it and the
/// resulting structure has more than one atom.
#[derive(Debug, Clone, Default)]
pub struct ValidityOracle<P> {
    parser: P,
}

impl<P: StructureParser> ValidityOracle<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Parse `smiles` and keep the structure only if it passes the validity rule.
    fn valid_structure(&self, smiles: &str) -> Option<P::Structure> {
        if smiles.is_empty() {
            return None;
        }
        match self.parser.parse(smiles) {
            Some(structure) if self.parser.atom_count(&structure) > 1 => Some(structure),
            _ => None,
        }
    }

    pub fn is_valid(&self, smiles: &str) -> bool {
        self.valid_structure(smiles).is_some()
    }

    /// Valid and strictly shorter than `max_len` characters.
    pub fn is_valid_and_short(&self, smiles: &str, max_len: usize) -> bool {
        smiles.chars().count() < max_len && self.is_valid(smiles)
    }

    /// Apply `f` to the parsed structure when `smiles` is valid, else return `default`.
    pub fn apply_if_valid<R, F>(&self, smiles: &str, f: F, default: R) -> R
    where
        F: FnOnce(&P::Structure) -> R,
    {
        match self.valid_structure(smiles) {
            Some(structure) => f(&structure),
            None => default,
        }
    }

    pub fn apply_if_valid_or_zero<F>(&self, smiles: &str, f: F) -> f64
    where
        F: FnOnce(&P::Structure) -> f64,
    {
        self.apply_if_valid(smiles, f, 0.0)
    }

    /// Lazily keep the valid strings, in input order.
    ///
    /// The adapter is `Clone` whenever the input iterator is, and a clone
    /// starts over and re-checks every element.
    pub fn filter_valid<I>(&self, strings: I) -> FilterValid<'_, P, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        FilterValid {
            oracle: self,
            inner: strings.into_iter(),
        }
    }

    pub fn canonicalize(&self, smiles: &str) -> Option<String> {
        self.parser.canonicalize(smiles)
    }
}

/// Iterator returned by [`ValidityOracle::filter_valid`].
pub struct FilterValid<'a, P, I> {
    oracle: &'a ValidityOracle<P>,
    inner: I,
}

impl<P, I: Clone> Clone for FilterValid<'_, P, I> {
    fn clone(&self) -> Self {
        Self {
            oracle: self.oracle,
            inner: self.inner.clone(),
        }
    }
}

impl<P, I> Iterator for FilterValid<'_, P, I>
where
    P: StructureParser,
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let oracle = self.oracle;
        self.inner.find(|s| oracle.is_valid(s.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AtomwiseParser;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Treats every run of uppercase letters as a chain of atoms.
    struct LetterParser {
        calls: AtomicUsize,
    }

    impl StructureParser for LetterParser {
        type Structure = usize;

        fn parse(&self, smiles: &str) -> Option<usize> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            smiles
                .chars()
                .all(|c| c.is_ascii_uppercase())
                .then(|| smiles.len())
        }

        fn atom_count(&self, structure: &usize) -> usize {
            *structure
        }

        fn canonicalize(&self, smiles: &str) -> Option<String> {
            self.parse(smiles).map(|_| smiles.to_string())
        }
    }

    fn letter_oracle() -> ValidityOracle<LetterParser> {
        ValidityOracle::new(LetterParser {
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_is_valid() {
        let oracle = ValidityOracle::new(AtomwiseParser::new());
        assert!(oracle.is_valid("CCO"));
        assert!(!oracle.is_valid(""));
        assert!(!oracle.is_valid("C1CC"));
        // Single atom structures are degenerate.
        assert!(!oracle.is_valid("C"));
        assert!(!oracle.is_valid("[NH4+]"));
    }

    #[test]
    fn test_empty_string_skips_parser() {
        let oracle = letter_oracle();
        assert!(!oracle.is_valid(""));
        assert_eq!(oracle.parser().calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_is_valid_and_short() {
        let oracle = ValidityOracle::new(AtomwiseParser::new());
        assert!(oracle.is_valid_and_short("CCO", 4));
        assert!(!oracle.is_valid_and_short("CCO", 3));
        assert!(!oracle.is_valid_and_short("C(", 10));
    }

    #[test]
    fn test_apply_if_valid() {
        let oracle = ValidityOracle::new(AtomwiseParser::new());
        let atoms = |smiles: &str| {
            oracle.apply_if_valid(smiles, |mol| mol.num_atoms() as f64, -1.0)
        };
        assert_eq!(atoms("CC(=O)O"), 4.0);
        assert_eq!(atoms("C"), -1.0);
        assert_eq!(atoms("not smiles"), -1.0);

        assert_eq!(oracle.apply_if_valid_or_zero("Cl(", |_| 1.0), 0.0);
        assert_eq!(oracle.apply_if_valid_or_zero("ClCl", |_| 1.0), 1.0);
    }

    #[test]
    fn test_apply_if_valid_skips_callback_when_invalid() {
        let oracle = ValidityOracle::new(AtomwiseParser::new());
        let called = Cell::new(false);
        let value = oracle.apply_if_valid(
            "C",
            |_| {
                called.set(true);
                1
            },
            0,
        );
        assert_eq!(value, 0);
        assert!(!called.get());
    }

    #[test]
    fn test_filter_valid_preserves_order() {
        let oracle = letter_oracle();
        let samples = ["AB", "zz", "ABC", "", "A", "BA", "A1"];
        let kept: Vec<&str> = oracle.filter_valid(samples).collect();
        assert_eq!(kept, vec!["AB", "ABC", "BA"]);
    }

    #[test]
    fn test_filter_valid_restarts_and_reevaluates() {
        let oracle = letter_oracle();
        let samples = vec!["AB".to_string(), "x".to_string(), "CD".to_string()];
        let filtered = oracle.filter_valid(samples.iter());

        let first: Vec<_> = filtered.clone().collect();
        let calls_after_first = oracle.parser().calls.load(Ordering::Relaxed);
        let second: Vec<_> = filtered.collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(oracle.parser().calls.load(Ordering::Relaxed), calls_after_first * 2);
    }

    #[test]
    fn test_canonicalize_delegates() {
        let oracle = ValidityOracle::new(AtomwiseParser::new());
        assert_eq!(oracle.canonicalize("c1ccccc1").as_deref(), Some("c1ccccc1"));
        assert!(oracle.canonicalize("c1cc").is_none());
    }
}
