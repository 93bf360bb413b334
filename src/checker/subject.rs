use crate::tree::{NodeId, ParseTree};

const VERB_PHRASE: &str = "VP";
const INFLECTED_PHRASE: &str = "IP";
const SUBJECT: &str = "NP-SUBJ";

/// Finds the subject noun phrase of the verb matched by the terminal `verb`.
///
/// The subject is first looked for in the verb phrase enclosing the verb's own verb phrase,
/// where it may be embedded (as in 'Í dag langaði Páli bróður að fara í sund'), then in
/// the enclosing inflected phrase.
pub fn find_verb_subject(tree: &ParseTree, verb: NodeId) -> Option<NodeId> {
    tree.enclosing_tag(verb, VERB_PHRASE)
        .and_then(|vp| tree.enclosing_tag(vp, VERB_PHRASE))
        .and_then(|vp| tree.child_by_tag(vp, SUBJECT))
        .or_else(|| {
            tree.enclosing_tag(verb, INFLECTED_PHRASE)
                .and_then(|ip| tree.child_by_tag(ip, SUBJECT))
        })
}
