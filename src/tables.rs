//! Read-only lexical tables consulted by the checks.

use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use crate::types::Case;
use crate::Error;

/// Verbs that are commonly used with a subject in the wrong case.
/// Maps a verb lemma to pairs of (wrong case, correct case).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerbSubjectErrors {
    errors: IndexMap<String, IndexMap<Case, Case>>,
}

impl VerbSubjectErrors {
    pub fn new() -> Self {
        VerbSubjectErrors::default()
    }

    pub fn insert<S: Into<String>>(&mut self, verb: S, wrong: Case, correct: Case) {
        self.errors
            .entry(verb.into())
            .or_insert_with(IndexMap::new)
            .insert(wrong, correct);
    }

    /// The correct subject case of `verb` if its subject in `case` is a known error.
    pub fn correction(&self, verb: &str, case: Case) -> Option<Case> {
        self.errors.get(verb)?.get(&case).copied()
    }

    /// All known (wrong, correct) subject case pairs of `verb`.
    pub fn errors(&self, verb: &str) -> Option<&IndexMap<Case, Case>> {
        self.errors.get(verb)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Verbs that are commonly combined with the wrong preposition.
/// Maps a verb lemma to pairs of (wrong preposition, correct preposition).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrepositionErrors {
    errors: IndexMap<String, IndexMap<String, String>>,
}

impl PrepositionErrors {
    pub fn new() -> Self {
        PrepositionErrors::default()
    }

    pub fn insert<V: Into<String>, W: Into<String>, C: Into<String>>(
        &mut self,
        verb: V,
        wrong: W,
        correct: C,
    ) {
        self.errors
            .entry(verb.into())
            .or_insert_with(IndexMap::new)
            .insert(wrong.into(), correct.into());
    }

    /// The correct preposition if `preposition` is a known error with `verb`.
    pub fn correction(&self, verb: &str, preposition: &str) -> Option<&str> {
        self.errors
            .get(verb)?
            .get(preposition)
            .map(|x| x.as_str())
    }

    /// The verb as stored in the table, if it has any preposition errors.
    pub fn verb(&self, verb: &str) -> Option<&str> {
        self.errors.get_key_value(verb).map(|(x, _)| x.as_str())
    }

    pub fn contains_verb(&self, verb: &str) -> bool {
        self.errors.contains_key(verb)
    }

    /// All prepositions that are wrong with at least one verb.
    pub fn wrong_prepositions(&self) -> impl Iterator<Item = &str> {
        self.errors
            .values()
            .flat_map(|x| x.keys().map(|x| x.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// All lexical tables. Missing tables are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub verb_subjects: VerbSubjectErrors,
    pub prepositions: PrepositionErrors,
}

impl Tables {
    /// Loads the tables from a path to a binary.
    ///
    /// # Errors
    /// - If the file can not be opened.
    /// - If the file content can not be deserialized to tables.
    pub fn new<P: AsRef<Path>>(p: P) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(p.as_ref())?);
        Tables::from_reader(reader)
    }

    /// Loads the tables from a reader of the binary format.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let tables: Tables = bincode::deserialize_from(reader)?;
        tables.log_loaded();
        Ok(tables)
    }

    /// Loads the tables from a reader of JSON.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let tables: Tables = serde_json::from_reader(reader)?;
        tables.log_loaded();
        Ok(tables)
    }

    /// Serializes the tables to the binary format.
    pub fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        Ok(bincode::serialize_into(writer, self)?)
    }

    fn log_loaded(&self) {
        info!(
            "Loaded subject case errors for {} verbs and preposition errors for {} verbs.",
            self.verb_subjects.len(),
            self.prepositions.len()
        );
    }
}
