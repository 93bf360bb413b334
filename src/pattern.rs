//! Matching of questionable usage patterns in parse trees.
//!
//! These are typically not grammatical errors but wrong usage, e.g. attaching an uncommon
//! preposition to a verb: "Ég leitaði af kettinum" should very likely be
//! "Ég leitaði að kettinum".

use log::debug;
use std::collections::HashSet;

use crate::tables::PrepositionErrors;
use crate::text;
use crate::tree::{NodeId, NodeKind, ParseTree};
use crate::types::{Annotation, Token};

/// Code of verbs with a wrong preposition.
pub const WRONG_PREPOSITION: &str = "P001";

const VERB_PHRASE: &str = "VP";
const PREPOSITIONAL_PHRASE: &str = "PP";
const PREPOSITION: &str = "P";
const VERB_CONTEXTS: &[&str] = &["NP-PRD", "IP-INF"];

#[derive(Debug, Clone, PartialEq)]
struct Match<'t> {
    preposition: NodeId,
    wrong: String,
    right: &'t str,
}

/// Finds verbs combined with a preposition they usually do not take.
pub struct PatternMatcher<'a> {
    tokens: &'a [Token],
    tree: &'a ParseTree,
    prepositions: &'a PrepositionErrors,
}

impl<'a> PatternMatcher<'a> {
    pub fn new(tokens: &'a [Token], tree: &'a ParseTree, prepositions: &'a PrepositionErrors) -> Self {
        PatternMatcher {
            tokens,
            tree,
            prepositions,
        }
    }

    /// Whether the sentence contains a word which is a wrong preposition for some verb.
    /// Matching is only attempted if it does.
    pub fn is_triggered(&self) -> bool {
        let wrong: HashSet<&str> = self.prepositions.wrong_prepositions().collect();
        if wrong.is_empty() {
            return false;
        }

        self.tokens.iter().filter(|x| x.is_word()).any(|token| {
            wrong.contains(token.text().to_lowercase().as_str())
                || token
                    .analyses()
                    .iter()
                    .any(|x| wrong.contains(x.lemma.as_str()))
        })
    }

    /// The lemma of `id` if it is a verb terminal without arguments which has
    /// preposition errors.
    fn verb_lemma(&self, id: NodeId) -> Option<&'a str> {
        let tree: &'a ParseTree = self.tree;
        let terminal = tree.terminal(id)?;
        if !terminal.is_verb() || terminal.has_variant("1") || terminal.has_variant("2") {
            return None;
        }

        let token = self.tokens.get(terminal.token())?;
        let prepositions: &'a PrepositionErrors = self.prepositions;
        prepositions.verb(&terminal.lemma(token))
    }

    /// Verb terminals directly below `id`, by lemma.
    fn direct_verbs(&self, id: NodeId) -> Vec<&'a str> {
        self.tree
            .structural_children(id)
            .into_iter()
            .filter_map(|x| self.verb_lemma(x))
            .collect()
    }

    /// Verb terminals anywhere below `id`, by lemma.
    fn nested_verbs(&self, id: NodeId) -> Vec<&'a str> {
        self.tree
            .terminals_under(id)
            .iter()
            .filter_map(|x| self.verb_lemma(*x))
            .collect()
    }

    /// The lowercase text of the terminals directly below a `P` node.
    fn preposition_texts(&self, id: NodeId) -> Vec<String> {
        self.tree
            .structural_children(id)
            .into_iter()
            .filter_map(|x| self.tree.terminal(x))
            .filter_map(|x| self.tokens.get(x.token()))
            .map(|x| x.text().to_lowercase())
            .collect()
    }

    /// Finds a `P` node below the prepositional phrase `pp` which is wrong for one of `verbs`.
    fn find_preposition(&self, verbs: &[&'a str], pp: NodeId) -> Option<Match<'a>> {
        let prepositions: &'a PrepositionErrors = self.prepositions;
        if verbs.is_empty() {
            return None;
        }

        self.tree
            .preorder(pp)
            .filter(|x| self.tree.tag(*x) == Some(PREPOSITION))
            .find_map(|preposition| {
                self.preposition_texts(preposition)
                    .into_iter()
                    .find_map(|wrong| {
                        verbs.iter().find_map(|verb| {
                            let right = prepositions.correction(verb, &wrong)?;
                            Some(Match {
                                preposition,
                                wrong: wrong.clone(),
                                right,
                            })
                        })
                    })
            })
    }

    fn children_with_tag(&self, id: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.tree
            .structural_children(id)
            .into_iter()
            .filter(|x| self.tree.tag(*x).map_or(false, |tag| tags.contains(&tag)))
            .collect()
    }

    /// `VP > { VP >> { verb } PP >> { P > { wrong } } }`
    fn match_nested(&self, id: NodeId) -> Option<Match<'a>> {
        if self.tree.tag(id) != Some(VERB_PHRASE) {
            return None;
        }

        let pps = self.children_with_tag(id, &[PREPOSITIONAL_PHRASE]);
        self.children_with_tag(id, &[VERB_PHRASE])
            .into_iter()
            .find_map(|vp| {
                let verbs = self.nested_verbs(vp);
                pps.iter().find_map(|pp| self.find_preposition(&verbs, *pp))
            })
    }

    /// `. > { (NP-PRD | IP-INF) > { VP > { verb } } PP >> { P > { wrong } } }`
    fn match_context(&self, id: NodeId) -> Option<Match<'a>> {
        let pps = self.children_with_tag(id, &[PREPOSITIONAL_PHRASE]);
        if pps.is_empty() {
            return None;
        }

        self.children_with_tag(id, VERB_CONTEXTS)
            .into_iter()
            .flat_map(|context| self.children_with_tag(context, &[VERB_PHRASE]))
            .find_map(|vp| {
                let verbs = self.direct_verbs(vp);
                pps.iter().find_map(|pp| self.find_preposition(&verbs, *pp))
            })
    }

    /// The verb phrase to show in the annotation: the first one below `id` with a directly
    /// matching verb, else the first one with a matching verb anywhere below it.
    fn verb_phrase(&self, id: NodeId, wrong: &str) -> Option<NodeId> {
        let has_match = |verbs: Vec<&'a str>| {
            verbs
                .iter()
                .any(|verb| self.prepositions.correction(verb, wrong).is_some())
        };
        let vps: Vec<NodeId> = self
            .tree
            .preorder(id)
            .filter(|x| self.tree.tag(*x) == Some(VERB_PHRASE))
            .collect();

        vps.iter()
            .copied()
            .find(|vp| has_match(self.direct_verbs(*vp)))
            .or_else(|| vps.iter().copied().find(|vp| has_match(self.nested_verbs(*vp))))
    }

    fn annotate(&self, id: NodeId, m: Match) -> Option<Annotation> {
        let vp = self.verb_phrase(id, &m.wrong)?;
        let (vp_start, vp_end) = self.tree.span(vp);
        let (p_start, p_end) = self.tree.span(m.preposition);
        let (start, end) = (vp_start.min(p_start), vp_end.max(p_end));

        let vp_text = text::node_text(self.tokens, self.tree, vp);
        // padded so that the preposition is matched as a whole word at the span edges
        let span_text = format!(" {} ", text::raw_span_text(self.tokens, start, end));
        let wrong = format!(" {} ", m.wrong);

        let suggestion = if span_text.matches(&wrong).count() == 1 {
            span_text
                .replace(&wrong, &format!(" {} ", m.right))
                .trim()
                .to_owned()
        } else {
            String::new()
        };

        Some(
            Annotation::new(
                start,
                end,
                WRONG_PREPOSITION,
                format!(
                    "'{0} {1}' should probably be '{0} {2}'",
                    vp_text, m.wrong, m.right
                ),
            )
            .with_detail(format!(
                "The verb '{}' usually takes the preposition '{}', not '{}'.",
                vp_text, m.right, m.wrong
            ))
            .with_suggestion(Some(suggestion)),
        )
    }

    /// Returns an annotation for each node matching one of the patterns.
    pub fn run(&self) -> Vec<Annotation> {
        if !self.is_triggered() {
            return Vec::new();
        }

        self.tree
            .preorder(self.tree.root())
            .filter(|x| matches!(self.tree.kind(*x), NodeKind::Nonterminal(_)))
            .filter_map(|id| {
                let m = self.match_nested(id).or_else(|| self.match_context(id))?;
                let annotation = self.annotate(id, m)?;
                debug!("{}", annotation);
                Some(annotation)
            })
            .collect()
    }
}
