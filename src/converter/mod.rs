//! Document conversion
//!
//! Turns raw fetched pages into stopword-filtered token documents. The
//! [`Converter`] schedules one [`Resolver`] per document on a bounded pool.

mod coordinator;
mod markup;
mod resolver;
mod stopwords;
mod tokenizer;

pub use coordinator::{Converter, ConverterHandle, SubmitError};
pub use markup::strip_markup;
pub use resolver::{ResolveError, Resolved, Resolver};
pub use stopwords::StopwordSet;
pub use tokenizer::{JiebaTokenizer, Tokenizer, UnicodeTokenizer};
