use log::{debug, warn};

use super::subject::find_verb_subject;
use crate::rule::{self, Context, Explanation, Registry};
use crate::tables::VerbSubjectErrors;
use crate::text;
use crate::tree::{NodeId, NodeKind, Nonterminal, Terminal};
use crate::types::{Annotation, Case};

/// Prefix of the codes of verb subject case errors.
pub const WRONG_CASE_PREFIX: &str = "P_WRONG_CASE_";

/// Walks a parse tree once in pre-order and collects annotations for error-tagged rules
/// and for verbs whose subject is in the wrong case.
pub(crate) struct ErrorFinder<'a> {
    ctx: Context<'a>,
    registry: &'a Registry,
    verb_subjects: &'a VerbSubjectErrors,
    annotations: Vec<Annotation>,
}

impl<'a> ErrorFinder<'a> {
    pub fn new(
        ctx: Context<'a>,
        registry: &'a Registry,
        verb_subjects: &'a VerbSubjectErrors,
    ) -> Self {
        ErrorFinder {
            ctx,
            registry,
            verb_subjects,
            annotations: Vec::new(),
        }
    }

    pub fn run(mut self) -> Vec<Annotation> {
        let tree = self.ctx.tree();

        for id in tree.preorder(tree.root()) {
            match tree.kind(id) {
                NodeKind::Terminal(terminal) => self.visit_token(id, terminal),
                NodeKind::Nonterminal(nonterminal) => self.visit_nonterminal(id, nonterminal),
            }
        }

        self.annotations
    }

    fn push(&mut self, annotation: Annotation) {
        debug!("{}", annotation);
        self.annotations.push(annotation);
    }

    fn visit_token(&mut self, id: NodeId, terminal: &'a Terminal) {
        if !terminal.is_verb() {
            return;
        }

        let token = match self.ctx.tokens().get(terminal.token()) {
            Some(token) => token,
            None => return,
        };
        let verb = terminal.lemma(token);

        if !terminal.is_subj() {
            // an impersonal verb matched by an ordinary terminal has a nominative subject
            if let Some(correct) = self.verb_subjects.correction(&verb, Case::Nominative) {
                self.wrong_subject_case(id, terminal, &verb, Case::Nominative, correct);
            }
            return;
        }

        if !(terminal.is_impersonal() || terminal.is_supine() || terminal.is_infinitive()) {
            return;
        }

        let case = match terminal.last_variant().and_then(Case::from_abbreviation) {
            Some(case) => case,
            None => {
                warn!("unknown subject case in terminal '{}'", terminal.name());
                return;
            }
        };

        if let Some(correct) = self.verb_subjects.correction(&verb, case) {
            self.wrong_subject_case(id, terminal, &verb, case, correct);
        }
    }

    fn wrong_subject_case(
        &mut self,
        id: NodeId,
        terminal: &Terminal,
        verb: &str,
        wrong: Case,
        correct: Case,
    ) {
        let code = format!(
            "{}{}_{}",
            WRONG_CASE_PREFIX,
            wrong.abbreviation(),
            correct.abbreviation()
        );

        let subject = find_verb_subject(self.ctx.tree(), id).and_then(|subject| {
            self.ctx
                .cast(correct, subject)
                .map(|suggestion| (subject, suggestion))
        });

        match subject {
            Some((subject, suggestion)) => {
                let correct_np = text::correct_spaces(&suggestion);

                // identical forms in both cases
                if self.ctx.node_text(subject) == correct_np {
                    debug!(
                        "suppressed {} for '{}': subject is the same in both cases",
                        code, correct_np
                    );
                    return;
                }

                let (start, end) = self.ctx.span(subject);
                self.push(
                    Annotation::new(
                        start,
                        end,
                        code,
                        format!(
                            "Should probably be '{}' (the subject of the verb 'að {}' should be in the {} case, not the {} case)",
                            correct_np,
                            verb,
                            correct.name(),
                            wrong.name()
                        ),
                    )
                    .with_suggestion(Some(suggestion)),
                );
            }
            None => {
                let index = terminal.token();
                self.push(Annotation::new(
                    index,
                    index,
                    code,
                    format!(
                        "The subject of the verb 'að {}' should be in the {} case, not the {} case",
                        verb,
                        correct.name(),
                        wrong.name()
                    ),
                ));
            }
        }
    }

    fn visit_nonterminal(&mut self, id: NodeId, nonterminal: &'a Nonterminal) {
        if nonterminal.is_interior() || nonterminal.is_optional() || !nonterminal.is_error() {
            return;
        }

        let (base, variants) = nonterminal.split_name();
        let (start, end) = self.ctx.span(id);
        let text = self.ctx.node_text(id);
        let code = rule::error_code(base);

        let annotation = match self
            .registry
            .explain(&self.ctx, base, variants, &text, id)
        {
            Explanation::Text(text) => Annotation::new(start, end, code.clone(), text),
            Explanation::Suggest { text, suggestion } => {
                Annotation::new(start, end, code.clone(), text).with_suggestion(Some(suggestion))
            }
            Explanation::Span {
                text,
                start,
                end,
                suggestion,
            } => Annotation::new(start, end, code.clone(), text).with_suggestion(suggestion),
        };

        self.push(if rule::is_warning(&code) {
            annotation.warning()
        } else {
            annotation
        });
    }
}
