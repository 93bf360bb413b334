//! Annotation of whole sentences.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::lexicon::{CastTable, Inflect, MemoryLexicon};
use crate::pattern::PatternMatcher;
use crate::rule::{Context, Registry};
use crate::tables::Tables;
use crate::types::{Annotation, Sentence, Token};

mod finder;
pub mod subject;

pub use finder::WRONG_CASE_PREFIX;
use finder::ErrorFinder;

/// Code of the annotation of a sentence which could not be parsed.
pub const UNPARSABLE: &str = "E001";
/// Code of the annotation of a sentence which is probably not in Icelandic.
pub const FOREIGN: &str = "E004";

/// Options for a checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerOptions {
    /// The fraction of words with at least one lexicon analysis below which a sentence
    /// is considered to be in another language.
    pub language_ratio: f64,
    /// The language check only applies to sentences with more words than this.
    pub min_words: usize,
    /// Whether to look for verbs used with a wrong preposition.
    pub patterns: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            language_ratio: 0.6,
            min_words: 2,
            patterns: true,
        }
    }
}

/// Annotates sentences with grammatical errors.
///
/// All data is read-only after construction so a checker can be shared across threads.
pub struct Checker<I: Inflect = MemoryLexicon> {
    tables: Tables,
    inflector: I,
    registry: Registry,
    casts: CastTable,
    options: CheckerOptions,
}

impl<I: Inflect> Checker<I> {
    /// Creates a new checker with the default rule registry and cast table.
    pub fn new(tables: Tables, inflector: I) -> Self {
        Checker {
            tables,
            inflector,
            registry: Registry::default(),
            casts: CastTable::default(),
            options: CheckerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CheckerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_casts(mut self, casts: CastTable) -> Self {
        self.casts = casts;
        self
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn inflector(&self) -> &I {
        &self.inflector
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    /// Whether too few words of the sentence are known to the lexicon.
    fn is_foreign(&self, tokens: &[Token]) -> bool {
        let (known, unknown) = tokens
            .iter()
            .filter(|x| x.is_word())
            .fold((0usize, 0usize), |(known, unknown), token| {
                if token.is_recognized() {
                    (known + 1, unknown)
                } else {
                    (known, unknown + 1)
                }
            });
        let words = known + unknown;

        words > self.options.min_words
            && (known as f64 / words as f64) < self.options.language_ratio
    }

    /// Returns the annotations of a sentence, ordered by start index ascending and then by
    /// end index descending.
    pub fn annotate(&self, sentence: &Sentence) -> Vec<Annotation> {
        let tokens = sentence.tokens();
        if tokens.is_empty() {
            return Vec::new();
        }
        let last = tokens.len() - 1;

        // errors found by the tokenizer, for all tokens of the sentence
        let mut annotations: Vec<Annotation> = tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| {
                let error = token.error()?;
                let end = i.saturating_add(error.span.max(1) - 1).min(last);
                Some(Annotation::new(
                    i,
                    end,
                    error.code.as_str(),
                    error.description.as_str(),
                ))
            })
            .collect();

        if self.is_foreign(tokens) {
            debug!("discarding {} annotations of foreign sentence", annotations.len());
            annotations = vec![Annotation::new(
                0,
                last,
                FOREIGN,
                "The sentence is probably not in Icelandic",
            )];
        } else if let Some(tree) = sentence.tree() {
            let ctx = Context::new(tokens, tree, &self.casts, &self.inflector);
            annotations.extend(
                ErrorFinder::new(ctx, &self.registry, &self.tables.verb_subjects).run(),
            );

            if self.options.patterns {
                let matcher = PatternMatcher::new(tokens, tree, &self.tables.prepositions);
                annotations.extend(matcher.run());
            }
        } else {
            annotations.push(Annotation::new(
                0,
                last,
                UNPARSABLE,
                "The sentence does not conform to the grammar",
            ));
        }

        annotations.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end)));
        annotations
    }

    /// Annotates each of the sentences.
    pub fn annotate_all(&self, sentences: &[Sentence]) -> Vec<Vec<Annotation>> {
        sentences.iter().map(|x| self.annotate(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Case;

    fn checker() -> Checker {
        let mut tables = Tables::default();
        tables
            .verb_subjects
            .insert("líka", Case::Nominative, Case::Dative);
        Checker::new(tables, MemoryLexicon::new())
    }

    #[test]
    fn empty_sentence_has_no_annotations() {
        let sentence = Sentence::new(Vec::new(), None).unwrap();
        assert!(checker().annotate(&sentence).is_empty());
    }

    #[test]
    fn token_errors_are_kept_for_unparsable_sentences() {
        let sentence = Sentence::new(
            vec![
                Token::word("Ég").with_analysis("ég", "pfn"),
                Token::word("sá").with_analysis("sjá", "so"),
                Token::word("kött").with_analysis("köttur", "no"),
                Token::word("i")
                    .with_analysis("í", "fs")
                    .with_error("S004", "'i' should be 'í'", 5),
            ],
            None,
        )
        .unwrap();

        let annotations = checker().annotate(&sentence);

        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].code(), UNPARSABLE);
        assert_eq!((annotations[0].start(), annotations[0].end()), (0, 3));
        // the span of the token error is clamped to the sentence
        assert_eq!(annotations[1].code(), "S004");
        assert_eq!((annotations[1].start(), annotations[1].end()), (3, 3));
    }

    #[test]
    fn huge_token_error_spans_are_clamped() {
        let sentence = Sentence::new(
            vec![
                Token::word("Hann").with_analysis("hann", "pfn"),
                Token::word("fór").with_analysis("fara", "so"),
                Token::word("heim")
                    .with_analysis("heim", "ao")
                    .with_error("S001", "d", usize::MAX),
                Token::punctuation("."),
            ],
            None,
        )
        .unwrap();

        let annotations = checker().annotate(&sentence);

        let error = annotations.iter().find(|x| x.code() == "S001").unwrap();
        assert_eq!((error.start(), error.end()), (2, 3));
    }

    #[test]
    fn annotate_all_keeps_sentence_order() {
        let unparsable =
            Sentence::new(vec![Token::word("Hann").with_analysis("hann", "pfn")], None).unwrap();
        let empty = Sentence::new(Vec::new(), None).unwrap();

        let annotations = checker().annotate_all(&[unparsable, empty]);

        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].len(), 1);
        assert_eq!(annotations[0][0].code(), UNPARSABLE);
        assert!(annotations[1].is_empty());
    }

    #[test]
    fn builder_replaces_registry_and_casts() {
        let mut registry = Registry::empty();
        registry.insert("VillaHeldur", crate::rule::SingularVerb);
        let checker = checker()
            .with_registry(registry)
            .with_casts(CastTable::default());

        assert_eq!(checker.registry().len(), 1);
        assert!(checker.inflector().is_empty());
        assert_eq!(
            checker.tables().verb_subjects.errors("líka").map(|x| x.len()),
            Some(1)
        );
    }

    #[test]
    fn foreign_sentences_get_a_single_annotation() {
        let tokens = vec![
            Token::word("This"),
            Token::word("is"),
            Token::word("not").with_error("S001", "unknown word", 1),
            Token::word("á").with_analysis("á", "fs"),
            Token::punctuation("."),
        ];
        let sentence = Sentence::new(tokens, None).unwrap();

        let annotations = checker().annotate(&sentence);

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].code(), FOREIGN);
        assert_eq!((annotations[0].start(), annotations[0].end()), (0, 4));
    }

    #[test]
    fn short_sentences_are_not_language_checked() {
        let sentence = Sentence::new(vec![Token::word("Hello"), Token::word("world")], None).unwrap();

        let annotations = checker().annotate(&sentence);
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].code(), UNPARSABLE);
    }

    #[test]
    fn options_change_the_language_check() {
        let sentence = Sentence::new(
            vec![Token::word("Hello"), Token::word("world")],
            None,
        )
        .unwrap();
        let checker = checker().with_options(CheckerOptions {
            min_words: 1,
            ..CheckerOptions::default()
        });

        assert_eq!(checker.annotate(&sentence)[0].code(), FOREIGN);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CheckerOptions = serde_json::from_str(r#"{"patterns": false}"#).unwrap();

        assert!(!options.patterns);
        assert_eq!(options.min_words, 2);
        assert!((options.language_ratio - 0.6).abs() < f64::EPSILON);
    }
}
