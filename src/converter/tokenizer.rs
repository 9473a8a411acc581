//! Text segmentation

use jieba_rs::Jieba;
use std::sync::{Arc, LazyLock};
use unicode_segmentation::UnicodeSegmentation;

static SHARED_JIEBA: LazyLock<Arc<JiebaTokenizer>> =
    LazyLock::new(|| Arc::new(JiebaTokenizer::new()));

/// Splits plain text into word-like units
///
/// Implementations must cope with scripts that do not delimit words with
/// whitespace.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Dictionary segmenter for Chinese and mixed text
///
/// Uses jieba's default dictionary with HMM discovery of unknown words.
/// Latin words and numbers come out whole. Tokens without any letter or digit
/// (whitespace, punctuation) are dropped.
pub struct JiebaTokenizer {
    jieba: Jieba,
}

impl JiebaTokenizer {
    /// Loads the default dictionary
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }

    /// Process-wide instance; the dictionary is loaded on first use
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED_JIEBA)
    }
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for JiebaTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .filter(|word| word.chars().any(char::is_alphanumeric))
            .map(String::from)
            .collect()
    }
}

/// Segmenter based on Unicode word boundaries (UAX #29)
///
/// Runs of letters and digits become one token; punctuation and whitespace are
/// dropped. Ideographic text is split per character, since UAX #29 has no
/// dictionary for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeTokenizer;

impl Tokenizer for UnicodeTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(String::from).collect()
    }
}
