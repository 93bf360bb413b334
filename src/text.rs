//! Token spans of tree nodes and their normalized display text.

use itertools::Itertools;
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

use crate::tree::{NodeId, ParseTree};
use crate::types::Token;
use crate::utils;

pub use crate::utils::correct_spaces;

/// The display text of a single token.
///
/// Word tokens are lowercased unless they are entirely uppercase and longer than one
/// character, or the lexicon has an analysis with an uppercase lemma (e.g. a name).
/// Other tokens are never changed.
pub fn token_text(token: &Token) -> Cow<'_, str> {
    let text = token.text();

    if !token.is_word() {
        return Cow::Borrowed(text);
    }

    if text.graphemes(true).nth(1).is_some() && utils::is_uppercase(text) {
        return Cow::Borrowed(text);
    }

    if token
        .analyses()
        .iter()
        .any(|x| utils::starts_uppercase(&x.lemma))
    {
        return Cow::Borrowed(text);
    }

    Cow::Owned(text.to_lowercase())
}

fn join_span<'t, F>(tokens: &'t [Token], start: usize, end: usize, text: F) -> String
where
    F: Fn(&'t Token) -> Cow<'t, str>,
{
    let end = end.min(tokens.len().saturating_sub(1));
    if tokens.is_empty() || start > end {
        return String::new();
    }

    correct_spaces(
        &tokens[start..=end]
            .iter()
            .filter(|x| !x.text().is_empty())
            .map(text)
            .join(" "),
    )
}

/// The display text of the tokens `start..=end` with normalized spacing.
pub fn span_text(tokens: &[Token], start: usize, end: usize) -> String {
    join_span(tokens, start, end, token_text)
}

/// The text of the tokens `start..=end` as written, with normalized spacing.
pub fn raw_span_text(tokens: &[Token], start: usize, end: usize) -> String {
    join_span(tokens, start, end, |x| Cow::Borrowed(x.text()))
}

/// The first and last original token index spanned by the node.
pub fn node_span(tree: &ParseTree, id: NodeId) -> (usize, usize) {
    tree.span(id)
}

/// The display text of the tokens spanned by the node.
pub fn node_text(tokens: &[Token], tree: &ParseTree, id: NodeId) -> String {
    let (start, end) = node_span(tree, id);
    span_text(tokens, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeSpec;

    #[test]
    fn ordinary_words_are_lowercased() {
        let token = Token::word("Bóndinn").with_analysis("bóndi", "no");
        assert_eq!(token_text(&token), "bóndinn");

        // a single uppercase letter is not an acronym
        assert_eq!(token_text(&Token::word("Á")), "á");
    }

    #[test]
    fn acronyms_and_names_keep_their_case() {
        assert_eq!(token_text(&Token::word("RÚV")), "RÚV");

        let token = Token::word("Páll").with_analysis("Páll", "person");
        assert_eq!(token_text(&token), "Páll");
    }

    #[test]
    fn punctuation_is_untouched() {
        assert_eq!(token_text(&Token::punctuation("«")), "«");
        assert_eq!(token_text(&Token::new("Ⅳ", crate::TokenKind::Other)), "Ⅳ");
    }

    #[test]
    fn span_text_normalizes_spacing() {
        let tokens = vec![
            Token::word("Í").with_analysis("í", "fs"),
            Token::word("Reykjavík").with_analysis("Reykjavík", "no"),
            Token::punctuation(","),
            Token::word("Hann"),
            Token::punctuation("."),
        ];

        assert_eq!(span_text(&tokens, 0, 4), "í Reykjavík, hann.");
        assert_eq!(span_text(&tokens, 1, 2), "Reykjavík,");
        assert_eq!(span_text(&tokens, 3, 99), "hann.");
        assert_eq!(raw_span_text(&tokens, 0, 4), "Í Reykjavík, Hann.");
    }

    #[test]
    fn node_text_uses_node_span() {
        let tokens = vec![
            Token::word("Mig").with_analysis("ég", "pfn"),
            Token::word("langar").with_analysis("langa", "so"),
        ];
        let tree = ParseTree::new(NodeSpec::phrase(
            "IP",
            vec![
                NodeSpec::phrase("NP-SUBJ", vec![NodeSpec::terminal("pfn_et_þf_p1", 0)]),
                NodeSpec::phrase("VP", vec![NodeSpec::terminal("so_subj_op_þf", 1)]),
            ],
        ))
        .unwrap();
        let subject = tree.child_by_tag(tree.root(), "NP-SUBJ").unwrap();

        assert_eq!(node_span(&tree, subject), (0, 0));
        assert_eq!(node_text(&tokens, &tree, subject), "mig");
        assert_eq!(node_text(&tokens, &tree, tree.root()), "mig langar");
    }
}
