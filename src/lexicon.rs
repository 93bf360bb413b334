//! The morphological lexicon seam and phrase recasting.
//!
//! The lexicon itself is an external collaborator. It is represented by the [Inflect] trait;
//! [MemoryLexicon] is a small in-memory implementation that can be loaded from JSON.

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt, io::Read};

use crate::text;
use crate::tree::{NodeId, ParseTree};
use crate::types::{Case, Token};

/// Terminal categories whose case variant is the case they govern, not their own inflection.
const GOVERNING_CATEGORIES: &[&str] = &["so", "fs"];

/// Produces word forms from a lemma, a category and a set of grammatical variants.
pub trait Inflect {
    /// Returns the form of `lemma` in `category` having all of `variants`, or `None`
    /// if the lexicon does not know it.
    fn inflect(&self, lemma: &str, category: &str, variants: &[&str]) -> Option<String>;
}

impl<'a, T> Inflect for &'a T
where
    T: Inflect + ?Sized,
{
    fn inflect(&self, lemma: &str, category: &str, variants: &[&str]) -> Option<String> {
        (*self).inflect(lemma, category, variants)
    }
}

/// One word form of a [MemoryLexicon].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub lemma: String,
    pub category: String,
    pub variants: Vec<String>,
    pub form: String,
}

type FormKey = (String, String, Vec<String>);

fn form_key(lemma: &str, category: &str, variants: &[&str]) -> FormKey {
    (
        lemma.to_owned(),
        category.to_owned(),
        variants.iter().map(|x| (*x).to_owned()).sorted().collect(),
    )
}

/// An in-memory lexicon. Variants are matched as a set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Form>", into = "Vec<Form>")]
pub struct MemoryLexicon {
    forms: IndexMap<FormKey, String>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        MemoryLexicon::default()
    }

    /// Loads a lexicon from a JSON array of [Form]s.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, crate::Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn insert<L: Into<String>, F: Into<String>>(
        &mut self,
        lemma: L,
        category: &str,
        variants: &[&str],
        form: F,
    ) {
        let lemma = lemma.into();
        self.forms
            .insert(form_key(&lemma, category, variants), form.into());
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Inflect for MemoryLexicon {
    fn inflect(&self, lemma: &str, category: &str, variants: &[&str]) -> Option<String> {
        self.forms
            .get(&form_key(lemma, category, variants))
            .cloned()
    }
}

impl From<Vec<Form>> for MemoryLexicon {
    fn from(forms: Vec<Form>) -> Self {
        forms.into_iter().collect()
    }
}

impl From<MemoryLexicon> for Vec<Form> {
    fn from(lexicon: MemoryLexicon) -> Self {
        lexicon
            .forms
            .into_iter()
            .map(|((lemma, category, variants), form)| Form {
                lemma,
                category,
                variants,
                form,
            })
            .collect()
    }
}

impl std::iter::FromIterator<Form> for MemoryLexicon {
    fn from_iter<I: IntoIterator<Item = Form>>(iter: I) -> Self {
        let mut lexicon = MemoryLexicon::new();
        for form in iter {
            let variants: Vec<&str> = form.variants.iter().map(|x| x.as_str()).collect();
            lexicon.insert(form.lemma.as_str(), &form.category, &variants, form.form.as_str());
        }
        lexicon
    }
}

/// A phrase rooted at a tree node, which can be re-rendered in another case.
#[derive(Clone, Copy)]
pub struct Phrase<'a> {
    tree: &'a ParseTree,
    node: NodeId,
    tokens: &'a [Token],
    inflector: &'a dyn Inflect,
}

impl<'a> Phrase<'a> {
    pub fn new(
        tree: &'a ParseTree,
        node: NodeId,
        tokens: &'a [Token],
        inflector: &'a dyn Inflect,
    ) -> Self {
        Phrase {
            tree,
            node,
            tokens,
            inflector,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The current display text of the phrase.
    pub fn text(&self) -> String {
        text::node_text(self.tokens, self.tree, self.node)
    }

    /// Renders the phrase with every terminal carrying a case variant put in `case`.
    /// Verbs and prepositions keep their form.
    /// Terminals the lexicon cannot inflect keep their display text.
    /// The result is space-joined token text.
    pub fn recast(&self, case: Case) -> String {
        self.tree
            .terminals_under(self.node)
            .iter()
            .filter_map(|id| {
                let terminal = self.tree.terminal(*id)?;
                let token = self.tokens.get(terminal.token())?;

                if GOVERNING_CATEGORIES.contains(&terminal.category()) || terminal.case().is_none()
                {
                    return Some(text::token_text(token).into_owned());
                }

                let variants: Vec<&str> = terminal
                    .variants()
                    .map(|x| {
                        if Case::from_abbreviation(x).is_some() {
                            case.abbreviation()
                        } else {
                            x
                        }
                    })
                    .collect();

                Some(
                    self.inflector
                        .inflect(&terminal.lemma(token), terminal.category(), &variants)
                        .unwrap_or_else(|| text::token_text(token).into_owned()),
                )
            })
            .join(" ")
    }

    pub fn nominative(&self) -> String {
        self.recast(Case::Nominative)
    }

    pub fn accusative(&self) -> String {
        self.recast(Case::Accusative)
    }

    pub fn dative(&self) -> String {
        self.recast(Case::Dative)
    }

    pub fn genitive(&self) -> String {
        self.recast(Case::Genitive)
    }
}

pub type CastFn = fn(&Phrase) -> String;

fn nominative(phrase: &Phrase) -> String {
    phrase.nominative()
}

fn accusative(phrase: &Phrase) -> String {
    phrase.accusative()
}

fn dative(phrase: &Phrase) -> String {
    phrase.dative()
}

fn genitive(phrase: &Phrase) -> String {
    phrase.genitive()
}

/// Maps each case to the function rendering a noun phrase in that case.
#[derive(Clone)]
pub struct CastTable {
    casts: IndexMap<Case, CastFn>,
}

impl fmt::Debug for CastTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastTable")
            .field("cases", &self.casts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for CastTable {
    fn default() -> Self {
        let mut casts: IndexMap<Case, CastFn> = IndexMap::new();
        casts.insert(Case::Nominative, nominative);
        casts.insert(Case::Accusative, accusative);
        casts.insert(Case::Dative, dative);
        casts.insert(Case::Genitive, genitive);
        CastTable { casts }
    }
}

impl CastTable {
    pub fn insert(&mut self, case: Case, cast: CastFn) {
        self.casts.insert(case, cast);
    }

    /// Renders `phrase` in `case`. Returns `None` if no function is registered for the case.
    pub fn cast(&self, case: Case, phrase: &Phrase) -> Option<String> {
        self.casts.get(&case).map(|cast| cast(phrase))
    }
}
