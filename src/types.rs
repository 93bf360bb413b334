//! Fundamental types used by this crate.

use bimap::BiMap;
use itertools::Itertools;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

use crate::tree::ParseTree;
use crate::utils;

#[derive(Debug, Clone, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("unknown grammatical case: {0}")]
    UnknownCase(String),
}

/// A grammatical case. Serialized as the abbreviation the grammar uses in terminal names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Case {
    Nominative,
    Accusative,
    Dative,
    Genitive,
}

lazy_static! {
    static ref ABBREVIATIONS: BiMap<Case, &'static str> = {
        let mut map = BiMap::new();
        map.insert(Case::Nominative, "nf");
        map.insert(Case::Accusative, "þf");
        map.insert(Case::Dative, "þgf");
        map.insert(Case::Genitive, "ef");
        map
    };
}

impl Case {
    /// All cases in their traditional order.
    pub fn all() -> &'static [Case] {
        &[
            Case::Nominative,
            Case::Accusative,
            Case::Dative,
            Case::Genitive,
        ]
    }

    /// The abbreviation of this case as it occurs in terminal variants, e.g. `þgf`.
    pub fn abbreviation(&self) -> &'static str {
        ABBREVIATIONS
            .get_by_left(self)
            .copied()
            .expect("every case has an abbreviation")
    }

    /// Looks up a case by its abbreviation. Returns `None` if `abbreviation` is not a case.
    pub fn from_abbreviation(abbreviation: &str) -> Option<Case> {
        ABBREVIATIONS.get_by_right(&abbreviation).copied()
    }

    /// The human-readable name of this case.
    pub fn name(&self) -> &'static str {
        match self {
            Case::Nominative => "nominative",
            Case::Accusative => "accusative",
            Case::Dative => "dative",
            Case::Genitive => "genitive",
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl TryFrom<&str> for Case {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Case::from_abbreviation(value).ok_or_else(|| Error::UnknownCase(value.to_owned()))
    }
}

impl TryFrom<String> for Case {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Case::try_from(value.as_str())
    }
}

impl From<Case> for String {
    fn from(case: Case) -> Self {
        case.abbreviation().to_owned()
    }
}

/// The coarse kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Word,
    Punctuation,
    Other,
}

/// One morphological analysis of a word, as found in the lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub lemma: String,
    /// Word class, e.g. `no` for nouns or `so` for verbs.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Analysis {
    pub fn new<S: Into<String>, C: Into<String>>(lemma: S, category: C) -> Self {
        Analysis {
            lemma: lemma.into(),
            category: category.into(),
            tags: Vec::new(),
        }
    }
}

fn default_error_span() -> usize {
    1
}

/// A spelling-level error attached to a token by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenError {
    pub code: String,
    pub description: String,
    /// Number of tokens, starting with the one carrying the error, that the error covers.
    #[serde(default = "default_error_span")]
    pub span: usize,
}

/// A token of the original (uncorrected) sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub(crate) text: String,
    pub(crate) kind: TokenKind,
    #[serde(default)]
    pub(crate) index: usize,
    #[serde(default)]
    pub(crate) analyses: Vec<Analysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<TokenError>,
}

impl Token {
    pub fn new<S: Into<String>>(text: S, kind: TokenKind) -> Self {
        Token {
            text: text.into(),
            kind,
            index: 0,
            analyses: Vec::new(),
            error: None,
        }
    }

    pub fn word<S: Into<String>>(text: S) -> Self {
        Token::new(text, TokenKind::Word)
    }

    pub fn punctuation<S: Into<String>>(text: S) -> Self {
        Token::new(text, TokenKind::Punctuation)
    }

    pub fn with_analysis<S: Into<String>, C: Into<String>>(mut self, lemma: S, category: C) -> Self {
        self.analyses.push(Analysis::new(lemma, category));
        self
    }

    pub fn with_error<C: Into<String>, D: Into<String>>(
        mut self,
        code: C,
        description: D,
        span: usize,
    ) -> Self {
        self.error = Some(TokenError {
            code: code.into(),
            description: description.into(),
            span,
        });
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The index of this token in the original token sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn analyses(&self) -> &[Analysis] {
        &self.analyses
    }

    pub fn error(&self) -> Option<&TokenError> {
        self.error.as_ref()
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Whether the lexicon knows at least one analysis of this token.
    pub fn is_recognized(&self) -> bool {
        !self.analyses.is_empty()
    }
}

/// An annotation of a span of the original tokens of a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) code: String,
    pub(crate) text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) suggest: Option<String>,
}

impl Annotation {
    pub fn new<C: Into<String>, T: Into<String>>(start: usize, end: usize, code: C, text: T) -> Self {
        debug_assert!(start <= end, "annotation must not end before it starts");
        Annotation {
            start,
            end,
            code: code.into(),
            text: text.into(),
            detail: None,
            suggest: None,
        }
    }

    /// Sets the suggested replacement of the annotated span. An empty suggestion means deletion.
    pub fn with_suggestion<S: Into<String>>(mut self, suggest: Option<S>) -> Self {
        self.suggest = suggest.map(Into::into);
        self
    }

    pub fn with_detail<S: Into<String>>(mut self, detail: S) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Marks this annotation as a warning rather than an error.
    pub fn warning(mut self) -> Self {
        if !self.is_warning() {
            self.code.push_str("/w");
        }
        self
    }

    /// The index of the first token to which the annotation applies.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The index of the last token to which the annotation applies (inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// A longer explanation, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The suggested replacement as space-joined token text.
    /// Apply [correct_spaces][crate::text::correct_spaces] before displaying it.
    pub fn suggest(&self) -> Option<&str> {
        self.suggest.as_deref()
    }

    pub fn is_warning(&self) -> bool {
        self.code.ends_with("/w")
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}-{:03}: {:6} {}",
            self.start, self.end, self.code, self.text
        )?;
        if let Some(suggest) = &self.suggest {
            write!(f, " / [{}]", suggest)?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawSentence {
    tokens: Vec<Token>,
    #[serde(default)]
    tree: Option<ParseTree>,
}

impl TryFrom<RawSentence> for Sentence {
    type Error = crate::Error;

    fn try_from(raw: RawSentence) -> Result<Self, Self::Error> {
        Sentence::new(raw.tokens, raw.tree)
    }
}

/// A sentence as handed over by the parser: all original tokens, including those the
/// parser could not place, and the chosen parse tree if parsing succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawSentence")]
pub struct Sentence {
    tokens: Vec<Token>,
    tree: Option<ParseTree>,
}

impl Sentence {
    /// Creates a new sentence. Token indices are set from the token positions.
    ///
    /// # Errors
    /// - If a terminal of the tree refers to a token outside of `tokens`.
    pub fn new(mut tokens: Vec<Token>, tree: Option<ParseTree>) -> Result<Self, crate::Error> {
        for (index, token) in tokens.iter_mut().enumerate() {
            token.index = index;
        }

        if let Some(tree) = &tree {
            tree.validate(tokens.len())?;
        }

        Ok(Sentence { tokens, tree })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tree(&self) -> Option<&ParseTree> {
        self.tree.as_ref()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The original text of the sentence with normalized spacing.
    pub fn text(&self) -> String {
        utils::correct_spaces(&self.tokens.iter().map(|x| x.text.as_str()).join(" "))
    }
}
