//! Fixed-length encoding and decoding of SMILES strings against a vocabulary.

use std::borrow::Cow;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::vocabulary::Vocabulary;

/// Right-pad `s` with `pad_char` until it is `n` characters long.
///
/// Strings already `n` characters or longer are returned unchanged; nothing
/// is ever truncated.
pub fn pad(s: &str, n: usize, pad_char: char) -> Cow<'_, str> {
    let len = s.chars().count();
    if len >= n {
        return Cow::Borrowed(s);
    }
    let mut padded = String::with_capacity(s.len() + (n - len) * pad_char.len_utf8());
    padded.push_str(s);
    padded.extend(std::iter::repeat(pad_char).take(n - len));
    Cow::Owned(padded)
}

/// Remove every trailing `pad_char` from `s`.
#[inline]
pub fn unpad(s: &str, pad_char: char) -> &str {
    s.trim_end_matches(pad_char)
}

/// Encode a SMILES string into exactly `max_len` codes (or more, if the
/// string is already longer).
///
/// Fails on the first character that is not in the vocabulary.
pub fn encode(smiles: &str, max_len: usize, vocab: &Vocabulary) -> Result<Vec<u32>> {
    pad(smiles, max_len, vocab.pad_char())
        .chars()
        .map(|c| vocab.code_of(c).ok_or(Error::UnknownChar(c)))
        .collect()
}

/// Decode codes back to a SMILES string, stripping trailing padding.
pub fn decode(codes: &[u32], vocab: &Vocabulary) -> Result<String> {
    let mut result = String::with_capacity(codes.len());
    for &code in codes {
        result.push(vocab.char_of(code).ok_or(Error::UnknownCode(code))?);
    }
    let kept = unpad(&result, vocab.pad_char()).len();
    result.truncate(kept);
    Ok(result)
}

/// Encode multiple SMILES strings in parallel using rayon.
pub fn batch_encode<S>(smiles_list: &[S], max_len: usize, vocab: &Vocabulary) -> Result<Vec<Vec<u32>>>
where
    S: AsRef<str> + Sync,
{
    smiles_list
        .par_iter()
        .map(|smi| encode(smi.as_ref(), max_len, vocab))
        .collect()
}

/// Decode multiple code sequences in parallel.
pub fn batch_decode<C>(codes_list: &[C], vocab: &Vocabulary) -> Result<Vec<String>>
where
    C: AsRef<[u32]> + Sync,
{
    codes_list
        .par_iter()
        .map(|codes| decode(codes.as_ref(), vocab))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::build_vocab;
    use proptest::prelude::*;

    fn setup_vocab() -> Vocabulary {
        // ^=0, C=1, O=2, N=3, (=4, )=5, _=6
        build_vocab(["CCO", "N(C)C"], '_', '^').unwrap()
    }

    #[test]
    fn test_pad_short() {
        assert_eq!(pad("CC", 5, '_'), "CC___");
    }

    #[test]
    fn test_pad_exact_and_longer_unchanged() {
        assert_eq!(pad("CCO", 3, '_'), "CCO");
        assert_eq!(pad("CCOCC", 3, '_'), "CCOCC");
        assert!(matches!(pad("CCO", 3, '_'), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unpad_strips_only_trailing() {
        assert_eq!(unpad("C_C___", '_'), "C_C");
        assert_eq!(unpad("____", '_'), "");
        assert_eq!(unpad("CC", '_'), "CC");
    }

    #[test]
    fn test_encode_pads_to_max_len() {
        let vocab = setup_vocab();
        let codes = encode("CCO", 5, &vocab).unwrap();
        assert_eq!(codes, vec![1, 1, 2, 6, 6]);
    }

    #[test]
    fn test_encode_unknown_char() {
        let vocab = setup_vocab();
        let result = encode("CCS", 5, &vocab);
        assert!(matches!(result, Err(Error::UnknownChar('S'))));
    }

    #[test]
    fn test_decode_strips_padding() {
        let vocab = setup_vocab();
        assert_eq!(decode(&[0, 3, 4, 1, 5, 6, 6], &vocab).unwrap(), "^N(C)");
    }

    #[test]
    fn test_decode_invalid_code() {
        let vocab = setup_vocab();
        let result = decode(&[1, 999], &vocab);
        assert!(matches!(result, Err(Error::UnknownCode(999))));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let vocab = build_vocab(["AB", "BA"], '_', '^').unwrap();
        let codes = encode("AB", 4, &vocab).unwrap();
        assert_eq!(codes.len(), 4);
        assert_eq!(decode(&codes, &vocab).unwrap(), "AB");
    }

    #[test]
    fn test_batch_roundtrip_preserves_order() {
        let vocab = setup_vocab();
        let smiles = vec!["CCO", "N", "C(O)N", ""];
        let encoded = batch_encode(&smiles, 6, &vocab).unwrap();
        assert!(encoded.iter().all(|codes| codes.len() == 6));

        let decoded = batch_decode(&encoded, &vocab).unwrap();
        assert_eq!(decoded, smiles);
    }

    #[test]
    fn test_batch_errors_propagate() {
        let vocab = setup_vocab();
        assert!(batch_encode(&["CC", "Cl"], 4, &vocab).is_err());
        assert!(batch_decode(&[vec![1, 2], vec![42]], &vocab).is_err());
    }

    proptest! {
        #[test]
        fn prop_pad_contract(s in "[A-Za-z]{0,10}", n in 0usize..16) {
            let padded = pad(&s, n, '_');
            if s.len() >= n {
                prop_assert_eq!(padded.as_ref(), s.as_str());
            } else {
                prop_assert_eq!(padded.chars().count(), n);
                prop_assert!(padded.starts_with(s.as_str()));
                prop_assert_eq!(unpad(&padded, '_'), s.as_str());
            }
        }

        #[test]
        fn prop_roundtrip(corpus in prop::collection::vec("[CNOcn()=#1-9]{1,10}", 1..8), pick in 0usize..8, extra in 1usize..6) {
            let vocab = build_vocab(&corpus, '_', '^').unwrap();
            let s = &corpus[pick % corpus.len()];
            let max_len = s.chars().count() + extra;

            let codes = encode(s, max_len, &vocab).unwrap();
            prop_assert_eq!(codes.len(), max_len);
            prop_assert_eq!(decode(&codes, &vocab).unwrap(), s.clone());
        }
    }
}
