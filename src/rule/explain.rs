use log::warn;

use super::{default_explanation, variant_case, Context, Explain, Explanation};
use crate::text;
use crate::tree::NodeId;
use crate::types::Case;

/// A superfluous token. Suggests deleting the span.
#[derive(Debug, Clone)]
pub struct Redundant {
    template: String,
}

impl Redundant {
    /// `template` is the explanation, `{}` is replaced by the span text.
    pub fn new<S: Into<String>>(template: S) -> Self {
        Redundant {
            template: template.into(),
        }
    }
}

impl Explain for Redundant {
    fn explain(&self, _ctx: &Context, text: &str, _variants: &str, _node: NodeId) -> Explanation {
        Explanation::Suggest {
            text: self.template.replace("{}", text),
            suggestion: String::new(),
        }
    }
}

/// A phrase which should be replaced by a fixed other phrase.
#[derive(Debug, Clone)]
pub struct FixedPhrase {
    template: String,
    replacement: String,
}

impl FixedPhrase {
    pub fn new<T: Into<String>, R: Into<String>>(template: T, replacement: R) -> Self {
        FixedPhrase {
            template: template.into(),
            replacement: replacement.into(),
        }
    }
}

impl Explain for FixedPhrase {
    fn explain(&self, _ctx: &Context, text: &str, _variants: &str, _node: NodeId) -> Explanation {
        Explanation::Suggest {
            text: self.template.replace("{}", text),
            suggestion: self.replacement.clone(),
        }
    }
}

/// A phrase which lacks a particle at its end, e.g. `frá því` -> `frá því að`.
#[derive(Debug, Clone)]
pub struct AppendParticle {
    particle: String,
    alternative: Option<String>,
}

impl AppendParticle {
    pub fn new<S: Into<String>>(particle: S) -> Self {
        AppendParticle {
            particle: particle.into(),
            alternative: None,
        }
    }

    /// Mentions another correct replacement in the explanation.
    pub fn with_alternative<S: Into<String>>(mut self, alternative: S) -> Self {
        self.alternative = Some(alternative.into());
        self
    }
}

impl Explain for AppendParticle {
    fn explain(&self, _ctx: &Context, text: &str, _variants: &str, _node: NodeId) -> Explanation {
        let suggestion = format!("{} {}", text, self.particle);
        let mut explanation = format!("'{}' should probably be '{}'", text, suggestion);
        if let Some(alternative) = &self.alternative {
            explanation.push_str(&format!(" (or '{}')", alternative));
        }

        Explanation::Suggest {
            text: explanation,
            suggestion,
        }
    }
}

/// A verb agreeing with a quantity phrase should be singular.
#[derive(Debug, Clone)]
pub struct SingularVerb;

impl Explain for SingularVerb {
    fn explain(&self, _ctx: &Context, text: &str, _variants: &str, _node: NodeId) -> Explanation {
        Explanation::Text(format!(
            "A verb referring to '{}' should probably be singular, not plural",
            text
        ))
    }
}

/// Subject and verb phrase disagree in number. The rule node has exactly two children,
/// the subject and the verb phrase; only the verb phrase is annotated.
#[derive(Debug, Clone)]
pub struct NumberAgreement;

impl Explain for NumberAgreement {
    fn explain(&self, ctx: &Context, text: &str, variants: &str, node: NodeId) -> Explanation {
        let children = ctx.tree().children(node);
        debug_assert_eq!(
            children.len(),
            2,
            "number agreement rule must have a subject and a verb phrase"
        );

        if children.len() != 2 {
            warn!(
                "number agreement rule at node {} has {} children, expected 2",
                node.index(),
                children.len()
            );
            return default_explanation(ctx, text, node);
        }

        let subject = ctx.node_text(children[0]);
        let number = if variants.split('_').any(|x| x == "et") {
            "singular"
        } else {
            "plural"
        };
        let (start, end) = ctx.span(children[1]);

        Explanation::Span {
            text: format!(
                "The verb should probably be {} like the subject '{}'",
                number, subject
            ),
            start,
            end,
            suggestion: None,
        }
    }
}

/// A noun phrase in the wrong case after a preposition. The variant suffix is the case
/// the preposition governs.
#[derive(Debug, Clone)]
pub struct PrepositionCase;

impl Explain for PrepositionCase {
    fn explain(&self, ctx: &Context, text: &str, variants: &str, node: NodeId) -> Explanation {
        let case = match variant_case(variants, node) {
            Some(case) => case,
            None => return default_explanation(ctx, text, node),
        };
        let tree = ctx.tree();

        let governed = tree
            .enclosing_tag(tree.first_terminal(node), "PP")
            .and_then(|pp| {
                let np = tree.child_by_tag(pp, "NP")?;
                let preposition = tree.child_by_tag(pp, "P")?;
                Some((np, preposition))
            });

        if let Some((np, preposition)) = governed {
            if let Some(cast) = ctx.cast(case, np) {
                let preposition = ctx.raw_text(preposition);
                let suggestion = format!("{} {}", preposition, cast);

                return Explanation::Suggest {
                    text: format!(
                        "Should probably be '{}' (the preposition '{}' governs the {} case)",
                        text::correct_spaces(&suggestion),
                        preposition,
                        case.name()
                    ),
                    suggestion,
                };
            }
        }

        Explanation::Text(format!(
            "The preposition '{}' governs the {} case",
            text.split_whitespace().next().unwrap_or(text),
            case.name()
        ))
    }
}

/// An explanatory phrase in parentheses which does not share the case of the phrase
/// it explains. The variant suffix is the expected case.
#[derive(Debug, Clone)]
pub struct ExplanatoryCase;

impl Explain for ExplanatoryCase {
    fn explain(&self, ctx: &Context, text: &str, variants: &str, node: NodeId) -> Explanation {
        match variant_case(variants, node) {
            Some(case) => Explanation::Text(format!(
                "'{}' might need to be in the {} case",
                text,
                case.name()
            )),
            None => default_explanation(ctx, text, node),
        }
    }
}

/// A wrong inflection ending, e.g. `læknirinn` for `lækninn`. The first terminal of the
/// rule is recast into a fixed case.
#[derive(Debug, Clone)]
pub struct Ending {
    case: Case,
}

impl Ending {
    pub fn new(case: Case) -> Self {
        Ending { case }
    }
}

impl Explain for Ending {
    fn explain(&self, ctx: &Context, _text: &str, _variants: &str, node: NodeId) -> Explanation {
        let terminal = ctx.tree().first_terminal(node);
        let suggestion = ctx.phrase(terminal).recast(self.case);

        Explanation::Suggest {
            text: format!(
                "Should probably be '{}'",
                text::correct_spaces(&suggestion)
            ),
            suggestion,
        }
    }
}
