//! Grammatical error annotation over disambiguated parse trees.
//! # Overview
//!
//! treerule consumes one parsed sentence at a time (its original tokens, and the parse tree a
//! parser chose for it) and produces an ordered list of [Annotation][types::Annotation]s,
//! each anchored to a span of the original tokens. It has the following core abstractions:
//! - A [ParseTree][tree::ParseTree], an arena of terminal and nonterminal nodes addressed by [NodeId][tree::NodeId].
//! - [Tables][tables::Tables] holding the read-only lexical data (verb subject case errors, verb preposition errors).
//! - An [Inflect][lexicon::Inflect] implementation standing in for the morphological lexicon.
//! - A [Checker][checker::Checker] that walks the tree, explains error-tagged grammar rules
//!   through a [Registry][rule::Registry], checks verb subject cases and merges everything
//!   with the token-level errors found by the tokenizer.
//!
//! # Examples
//!
//! Annotate a sentence the parser could not handle:
//!
//! ```
//! use treerule::{Checker, MemoryLexicon, Sentence, Tables, Token};
//!
//! let checker = Checker::new(Tables::default(), MemoryLexicon::default());
//!
//! let sentence = Sentence::new(
//!     vec![
//!         Token::word("Hann").with_analysis("hann", "pfn"),
//!         Token::word("fór").with_analysis("fara", "so"),
//!         Token::punctuation("."),
//!     ],
//!     None,
//! )?;
//!
//! let annotations = checker.annotate(&sentence);
//! assert_eq!(annotations.len(), 1);
//! assert_eq!(annotations[0].code(), "E001");
//! assert_eq!((annotations[0].start(), annotations[0].end()), (0, 2));
//! # Ok::<(), treerule::Error>(())
//! ```

use std::io;

use thiserror::Error;

pub mod checker;
pub mod lexicon;
pub mod pattern;
pub mod rule;
pub mod tables;
pub mod text;
pub mod tree;
pub mod types;
pub(crate) mod utils;

pub use checker::{Checker, CheckerOptions};
pub use lexicon::{CastTable, Inflect, MemoryLexicon, Phrase};
pub use tables::{PrepositionErrors, Tables, VerbSubjectErrors};
pub use tree::{NodeId, NodeSpec, ParseTree};
pub use types::{Analysis, Annotation, Case, Sentence, Token, TokenError, TokenKind};

#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    /// (De)serialization error. Can have occured during deserialization or during serialization.
    #[error(transparent)]
    Serialization(#[from] bincode::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Tree(#[from] tree::Error),
    #[error(transparent)]
    Type(#[from] types::Error),
}
