//! Character vocabulary construction and lookup.

use ahash::AHashMap;

use crate::constants::START_CODE;
use crate::error::{Error, Result};

/// Bijective mapping between characters and dense integer codes.
///
/// The start character always holds code 0 and the pad character the highest
/// code. Codes are dense, so the reverse mapping is a plain vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    code_of: AHashMap<char, u32>,
    char_of: Vec<char>,
    start_char: char,
    pad_char: char,
}

impl Vocabulary {
    /// Build the vocabulary from a corpus.
    ///
    /// Characters receive codes in order of first appearance, scanning the
    /// corpus in iteration order. The pad character is assigned last.
    ///
    /// Fails with [`Error::ReservedChar`] if the start and pad characters are
    /// equal or if either appears in the corpus.
    pub fn build<I, S>(strings: I, pad_char: char, start_char: char) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if pad_char == start_char {
            return Err(Error::ReservedChar(pad_char));
        }

        let mut code_of = AHashMap::new();
        let mut char_of = Vec::new();
        code_of.insert(start_char, START_CODE);
        char_of.push(start_char);

        for s in strings {
            for c in s.as_ref().chars() {
                if c == pad_char || c == start_char {
                    return Err(Error::ReservedChar(c));
                }
                if !code_of.contains_key(&c) {
                    code_of.insert(c, char_of.len() as u32);
                    char_of.push(c);
                }
            }
        }
        code_of.insert(pad_char, char_of.len() as u32);
        char_of.push(pad_char);

        log::info!(
            "Built vocabulary: {} corpus characters, {} total codes",
            char_of.len() - 2,
            char_of.len()
        );

        Ok(Self {
            code_of,
            char_of,
            start_char,
            pad_char,
        })
    }

    /// Code for a character, if it is in the vocabulary.
    #[inline]
    pub fn code_of(&self, c: char) -> Option<u32> {
        self.code_of.get(&c).copied()
    }

    /// Character for a code, if the code is in range.
    #[inline]
    pub fn char_of(&self, code: u32) -> Option<char> {
        self.char_of.get(code as usize).copied()
    }

    pub fn start_char(&self) -> char {
        self.start_char
    }

    pub fn pad_char(&self) -> char {
        self.pad_char
    }

    pub fn start_code(&self) -> u32 {
        START_CODE
    }

    /// Code of the pad character (always the highest code).
    pub fn pad_code(&self) -> u32 {
        (self.char_of.len() - 1) as u32
    }

    /// Number of codes, including start and pad.
    pub fn len(&self) -> usize {
        self.char_of.len()
    }

    /// Always false: start and pad are always present.
    pub fn is_empty(&self) -> bool {
        self.char_of.is_empty()
    }

    /// All `(char, code)` pairs in code order.
    pub fn entries(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.char_of
            .iter()
            .enumerate()
            .map(|(code, &c)| (c, code as u32))
    }
}

/// Build a vocabulary from `strings`; see [`Vocabulary::build`].
pub fn build_vocab<I, S>(strings: I, pad_char: char, start_char: char) -> Result<Vocabulary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Vocabulary::build(strings, pad_char, start_char)
}
