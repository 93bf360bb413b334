//! Explanations of error-tagged grammar rules.
//!
//! The grammar tags nonterminals which represent known error patterns with `error`.
//! Each such rule may have an [Explainer] registered under its base name (the part of the
//! name before the first `_`). The explainer turns the matched node into an [Explanation]:
//! a text, optionally with a suggested replacement and a narrower span.

use enum_dispatch::enum_dispatch;
use indexmap::IndexMap;
use log::warn;

use crate::lexicon::{CastTable, Inflect, Phrase};
use crate::text;
use crate::tree::{NodeId, ParseTree};
use crate::types::{Case, Token};

mod explain;

pub use explain::{
    AppendParticle, Ending, ExplanatoryCase, FixedPhrase, NumberAgreement, PrepositionCase,
    Redundant, SingularVerb,
};

/// Prefix of the codes of rule violations.
pub const CODE_PREFIX: &str = "P_NT_";

/// Rule name prefix which is not part of the code.
const EXPLANATORY_PREFIX: &str = "Villa";

/// Codes which are reported as warnings instead of errors.
const WARNING_CODES: &[&str] = &["P_NT_Að", "P_NT_Komma"];

/// Derives the annotation code from the base name of a rule, e.g. `VillaHeldur` -> `P_NT_Heldur`.
pub fn error_code(base: &str) -> String {
    let name = base.strip_prefix(EXPLANATORY_PREFIX).unwrap_or(base);
    format!("{}{}", CODE_PREFIX, name)
}

/// Whether annotations with this code are warnings.
pub fn is_warning(code: &str) -> bool {
    WARNING_CODES.contains(&code)
}

/// Everything an explainer may look at besides the matched node.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    tokens: &'a [Token],
    tree: &'a ParseTree,
    casts: &'a CastTable,
    inflector: &'a dyn Inflect,
}

impl<'a> Context<'a> {
    pub fn new(
        tokens: &'a [Token],
        tree: &'a ParseTree,
        casts: &'a CastTable,
        inflector: &'a dyn Inflect,
    ) -> Self {
        Context {
            tokens,
            tree,
            casts,
            inflector,
        }
    }

    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    pub fn tree(&self) -> &'a ParseTree {
        self.tree
    }

    pub fn span(&self, id: NodeId) -> (usize, usize) {
        text::node_span(self.tree, id)
    }

    /// The display text of the node.
    pub fn node_text(&self, id: NodeId) -> String {
        text::node_text(self.tokens, self.tree, id)
    }

    /// The original text of the node, without case normalization.
    pub fn raw_text(&self, id: NodeId) -> String {
        let (start, end) = self.span(id);
        text::raw_span_text(self.tokens, start, end)
    }

    pub fn phrase(&self, id: NodeId) -> Phrase<'a> {
        Phrase::new(self.tree, id, self.tokens, self.inflector)
    }

    /// Renders the phrase rooted at `id` in `case` using the cast table.
    pub fn cast(&self, case: Case, id: NodeId) -> Option<String> {
        self.casts.cast(case, &self.phrase(id))
    }
}

/// The explanation of a rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    /// Only a text, no suggestion.
    Text(String),
    /// A text and a replacement of the whole span. An empty replacement means deletion.
    Suggest { text: String, suggestion: String },
    /// A text for a different span than the one matched by the rule.
    Span {
        text: String,
        start: usize,
        end: usize,
        suggestion: Option<String>,
    },
}

impl Explanation {
    pub fn text(&self) -> &str {
        match self {
            Explanation::Text(text) => text,
            Explanation::Suggest { text, .. } => text,
            Explanation::Span { text, .. } => text,
        }
    }
}

/// The explanation used for rules without a registered explainer.
pub fn default_explanation(ctx: &Context, text: &str, node: NodeId) -> Explanation {
    let name = ctx.tree().nonterminal(node).map_or("", |x| x.name());
    Explanation::Text(format!("'{}' is probably incorrect (rule {})", text, name))
}

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum Explainer {
    Redundant,
    FixedPhrase,
    AppendParticle,
    SingularVerb,
    NumberAgreement,
    PrepositionCase,
    ExplanatoryCase,
    Ending,
}

#[enum_dispatch(Explainer)]
pub trait Explain {
    /// Explains the violation of a rule matched by `node`.
    /// `text` is the display text of the node, `variants` the variant suffix of the rule name.
    fn explain(&self, ctx: &Context, text: &str, variants: &str, node: NodeId) -> Explanation;
}

/// Maps rule base names to their explainers.
#[derive(Debug, Clone)]
pub struct Registry {
    explainers: IndexMap<String, Explainer>,
}

impl Registry {
    /// Creates a registry without any explainers.
    pub fn empty() -> Self {
        Registry {
            explainers: IndexMap::new(),
        }
    }

    pub fn insert<S: Into<String>, E: Into<Explainer>>(&mut self, name: S, explainer: E) {
        self.explainers.insert(name.into(), explainer.into());
    }

    pub fn get(&self, name: &str) -> Option<&Explainer> {
        self.explainers.get(name)
    }

    pub fn len(&self) -> usize {
        self.explainers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explainers.is_empty()
    }

    /// Explains the rule with base name `base` matched by `node`. Falls back to
    /// [default_explanation] if no explainer is registered.
    pub fn explain(
        &self,
        ctx: &Context,
        base: &str,
        variants: &str,
        text: &str,
        node: NodeId,
    ) -> Explanation {
        match self.get(base) {
            Some(explainer) => explainer.explain(ctx, text, variants, node),
            None => default_explanation(ctx, text, node),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();

        registry.insert("VillaHeldur", Redundant::new("'{}' is probably superfluous"));
        registry.insert("VillaSem", Redundant::new("'{}' is almost certainly superfluous"));
        registry.insert("VillaAð", Redundant::new("'{}' is almost certainly superfluous"));
        registry.insert("VillaKomma", Redundant::new("The comma is probably unnecessary"));

        registry.insert(
            "VillaVístAð",
            FixedPhrase::new("'{}' should probably be 'fyrst að'", "fyrst að"),
        );
        registry.insert(
            "VillaAnnaðhvort",
            FixedPhrase::new("Instead of '{}' there should probably be 'annað hvort'", "annað hvort"),
        );
        registry.insert(
            "VillaAnnaðHvort",
            FixedPhrase::new("Instead of '{}' there should probably be 'annaðhvort'", "annaðhvort"),
        );
        registry.insert("VillaNé", FixedPhrase::new("'né' might need to be 'eða'", "eða"));

        registry.insert("VillaFráÞvíAð", AppendParticle::new("að"));
        registry.insert("VillaÞóAð", AppendParticle::new("að").with_alternative("þótt"));

        registry.insert("VillaFjöldiHluti", SingularVerb);
        registry.insert("VillaEinnAf", SingularVerb);
        registry.insert("VillaÍTölu", NumberAgreement);
        registry.insert("VillaFsMeðFallstjórn", PrepositionCase);
        registry.insert("SvigaInnihaldNl", ExplanatoryCase);
        registry.insert("VillaEndingIR", Ending::new(Case::Accusative));
        registry.insert("VillaEndingANA", Ending::new(Case::Genitive));

        registry
    }
}

/// Parses the case given as the variant suffix of a rule name.
/// Logs a warning if the suffix is not a case.
pub(crate) fn variant_case(variants: &str, node: NodeId) -> Option<Case> {
    let case = Case::from_abbreviation(variants);
    if case.is_none() {
        warn!(
            "expected a case as variant of node {}, found '{}'",
            node.index(),
            variants
        );
    }
    case
}
