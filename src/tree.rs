//! An arena representation of the parse tree chosen for a sentence.
//!
//! Nodes are stored in pre-order and addressed by [NodeId]. Every node knows its parent,
//! its children and the span of original tokens it covers. Terminals additionally get a
//! tree-local match position, counted from left to right.

use serde::{Deserialize, Serialize};
use std::{borrow::Cow, convert::TryFrom};

use crate::types::{Case, Token};

#[derive(Debug, Clone, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("nonterminal '{0}' does not span any terminal")]
    EmptyNonterminal(String),
    #[error("terminal '{name}' refers to token {token}, but the sentence has {len} tokens")]
    TokenOutOfRange {
        name: String,
        token: usize,
        len: usize,
    },
}

/// Identifies a node in a [ParseTree].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The grammatical category of verbs in terminal names.
pub const VERB: &str = "so";

/// A terminal matching exactly one token, e.g. `so_1_þgf_subj_op_et_þf`.
/// The first `_`-separated part of the name is the category, the rest are variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    name: String,
    token: usize,
    lemma: Option<String>,
}

impl Terminal {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The index of the matched token in the original token sequence.
    pub fn token(&self) -> usize {
        self.token
    }

    pub fn category(&self) -> &str {
        self.name.split('_').next().unwrap_or("")
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.name.split('_').skip(1)
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants().any(|x| x == variant)
    }

    pub fn last_variant(&self) -> Option<&str> {
        self.variants().last()
    }

    /// The first case variant of this terminal, if any.
    pub fn case(&self) -> Option<Case> {
        self.variants().find_map(Case::from_abbreviation)
    }

    pub fn is_verb(&self) -> bool {
        self.category() == VERB
    }

    /// Whether this terminal specifies the case of the verb's subject.
    pub fn is_subj(&self) -> bool {
        self.has_variant("subj")
    }

    pub fn is_impersonal(&self) -> bool {
        self.has_variant("op")
    }

    /// Past participle compound (supine).
    pub fn is_supine(&self) -> bool {
        self.has_variant("sagnb")
    }

    pub fn is_infinitive(&self) -> bool {
        self.has_variant("nh")
    }

    /// The lemma of the matched word. Falls back to the first lexicon analysis of the
    /// token in this terminal's category, then to any analysis, then to the lowercased text.
    pub fn lemma<'a>(&'a self, token: &'a Token) -> Cow<'a, str> {
        if let Some(lemma) = &self.lemma {
            return Cow::Borrowed(lemma);
        }

        let category = self.category();

        token
            .analyses()
            .iter()
            .find(|x| x.category == category)
            .or_else(|| token.analyses().first())
            .map(|x| Cow::Borrowed(x.lemma.as_str()))
            .unwrap_or_else(|| Cow::Owned(token.text().to_lowercase()))
    }
}

/// A grammar rule node, e.g. `VillaÍTölu_et`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonterminal {
    name: String,
    tag: Option<String>,
    tags: Vec<String>,
    interior: bool,
    optional: bool,
}

impl Nonterminal {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Splits the name into the base name and the variant suffix after the first `_`.
    pub fn split_name(&self) -> (&str, &str) {
        match self.name.find('_') {
            Some(i) => (&self.name[..i], &self.name[i + 1..]),
            None => (self.name.as_str(), ""),
        }
    }

    /// The structural tag of this node, e.g. `VP`, `IP` or `NP-SUBJ`.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Whether the grammar author attached `tag` to this rule.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|x| x == tag)
    }

    pub fn is_error(&self) -> bool {
        self.has_tag("error")
    }

    /// Interior nodes are purely structural and never user-facing.
    pub fn is_interior(&self) -> bool {
        self.interior
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    span: (usize, usize),
    positions: (usize, usize),
}

/// A nested, serializable description of a tree. Converted into a [ParseTree] by flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeSpec {
    Terminal {
        name: String,
        token: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lemma: Option<String>,
    },
    Nonterminal {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
        #[serde(default)]
        interior: bool,
        #[serde(default)]
        optional: bool,
        children: Vec<NodeSpec>,
    },
}

impl NodeSpec {
    pub fn terminal<S: Into<String>>(name: S, token: usize) -> Self {
        NodeSpec::Terminal {
            name: name.into(),
            token,
            lemma: None,
        }
    }

    pub fn nonterminal<S: Into<String>>(name: S, children: Vec<NodeSpec>) -> Self {
        NodeSpec::Nonterminal {
            name: name.into(),
            tag: None,
            tags: Vec::new(),
            interior: false,
            optional: false,
            children,
        }
    }

    /// A nonterminal whose structural tag equals its name, e.g. `NP-SUBJ`.
    pub fn phrase<S: Into<String>>(tag: S, children: Vec<NodeSpec>) -> Self {
        let tag = tag.into();
        NodeSpec::nonterminal(tag.clone(), children).with_tag(tag)
    }

    pub fn with_lemma<S: Into<String>>(mut self, value: S) -> Self {
        if let NodeSpec::Terminal { lemma, .. } = &mut self {
            *lemma = Some(value.into());
        }
        self
    }

    pub fn with_tag<S: Into<String>>(mut self, value: S) -> Self {
        if let NodeSpec::Nonterminal { tag, .. } = &mut self {
            *tag = Some(value.into());
        }
        self
    }

    /// Marks this nonterminal as a known error pattern.
    pub fn error(mut self) -> Self {
        if let NodeSpec::Nonterminal { tags, .. } = &mut self {
            tags.push("error".into());
        }
        self
    }

    pub fn interior(mut self) -> Self {
        if let NodeSpec::Nonterminal { interior, .. } = &mut self {
            *interior = true;
        }
        self
    }

    pub fn optional(mut self) -> Self {
        if let NodeSpec::Nonterminal { optional, .. } = &mut self {
            *optional = true;
        }
        self
    }
}

/// A parse tree stored as an arena of nodes in pre-order. The root has id 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeSpec", into = "NodeSpec")]
pub struct ParseTree {
    nodes: Vec<Node>,
    terminals: Vec<NodeId>,
}

impl TryFrom<NodeSpec> for ParseTree {
    type Error = Error;

    fn try_from(spec: NodeSpec) -> Result<Self, Self::Error> {
        ParseTree::new(spec)
    }
}

impl From<ParseTree> for NodeSpec {
    fn from(tree: ParseTree) -> Self {
        tree.to_spec(tree.root())
    }
}

impl ParseTree {
    /// Flattens a nested tree description into an arena.
    ///
    /// # Errors
    /// - If a nonterminal does not span at least one terminal.
    pub fn new(spec: NodeSpec) -> Result<Self, Error> {
        let mut tree = ParseTree {
            nodes: Vec::new(),
            terminals: Vec::new(),
        };
        tree.push(spec, None)?;
        Ok(tree)
    }

    fn push(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> Result<NodeId, Error> {
        let id = NodeId(self.nodes.len());

        match spec {
            NodeSpec::Terminal { name, token, lemma } => {
                let position = self.terminals.len();
                self.terminals.push(id);
                self.nodes.push(Node {
                    kind: NodeKind::Terminal(Terminal { name, token, lemma }),
                    parent,
                    children: Vec::new(),
                    span: (token, token),
                    positions: (position, position),
                });
            }
            NodeSpec::Nonterminal {
                name,
                tag,
                tags,
                interior,
                optional,
                children,
            } => {
                let first = self.terminals.len();
                self.nodes.push(Node {
                    kind: NodeKind::Nonterminal(Nonterminal {
                        name,
                        tag,
                        tags,
                        interior,
                        optional,
                    }),
                    parent,
                    children: Vec::new(),
                    span: (0, 0),
                    positions: (first, first),
                });

                let mut child_ids = Vec::with_capacity(children.len());
                for child in children {
                    child_ids.push(self.push(child, Some(id))?);
                }

                if self.terminals.len() == first {
                    let name = match &self.nodes[id.0].kind {
                        NodeKind::Nonterminal(x) => x.name.clone(),
                        NodeKind::Terminal(x) => x.name.clone(),
                    };
                    return Err(Error::EmptyNonterminal(name));
                }

                let span = self.terminals[first..]
                    .iter()
                    .map(|x| self.nodes[x.0].span.0)
                    .fold((usize::MAX, 0), |(start, end), token| {
                        (start.min(token), end.max(token))
                    });

                let node = &mut self.nodes[id.0];
                node.children = child_ids;
                node.span = span;
                node.positions = (first, self.terminals.len() - 1);
            }
        }

        Ok(id)
    }

    fn to_spec(&self, id: NodeId) -> NodeSpec {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Terminal(x) => NodeSpec::Terminal {
                name: x.name.clone(),
                token: x.token,
                lemma: x.lemma.clone(),
            },
            NodeKind::Nonterminal(x) => NodeSpec::Nonterminal {
                name: x.name.clone(),
                tag: x.tag.clone(),
                tags: x.tags.clone(),
                interior: x.interior,
                optional: x.optional,
                children: node.children.iter().map(|x| self.to_spec(*x)).collect(),
            },
        }
    }

    /// Checks that all terminals refer to tokens of a sentence with `len` tokens.
    pub fn validate(&self, len: usize) -> Result<(), Error> {
        for id in &self.terminals {
            if let Some(terminal) = self.terminal(*id) {
                if terminal.token >= len {
                    return Err(Error::TokenOutOfRange {
                        name: terminal.name.clone(),
                        token: terminal.token,
                        len,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn terminal(&self, id: NodeId) -> Option<&Terminal> {
        match self.kind(id) {
            NodeKind::Terminal(x) => Some(x),
            NodeKind::Nonterminal(_) => None,
        }
    }

    pub fn nonterminal(&self, id: NodeId) -> Option<&Nonterminal> {
        match self.kind(id) {
            NodeKind::Nonterminal(x) => Some(x),
            NodeKind::Terminal(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// The first and last original token index covered by the node (inclusive).
    pub fn span(&self, id: NodeId) -> (usize, usize) {
        self.nodes[id.0].span
    }

    /// The structural tag of a node. Terminals have none.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nonterminal(id).and_then(|x| x.tag())
    }

    /// The closest proper ancestor of `id` with the given structural tag.
    pub fn enclosing_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.tag(node) == Some(tag) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// The children of `id` as seen by the structural tags. Nonterminals without a
    /// structural tag are transparent: their children count as children of `id`.
    pub fn structural_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut output = Vec::new();
        for child in self.children(id) {
            match self.kind(*child) {
                NodeKind::Nonterminal(x) if x.tag().is_none() => {
                    output.extend(self.structural_children(*child))
                }
                _ => output.push(*child),
            }
        }
        output
    }

    /// The first structural child of `id` with the given tag.
    pub fn child_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.structural_children(id)
            .into_iter()
            .find(|x| self.tag(*x) == Some(tag))
    }

    /// All terminal nodes, indexed by their tree-local match position.
    pub fn terminals(&self) -> &[NodeId] {
        &self.terminals
    }

    /// The terminal at the given tree-local match position.
    pub fn terminal_at(&self, position: usize) -> Option<NodeId> {
        self.terminals.get(position).copied()
    }

    /// The leftmost terminal below (or at) `id`.
    pub fn first_terminal(&self, id: NodeId) -> NodeId {
        self.terminals[self.nodes[id.0].positions.0]
    }

    /// The terminals below (or at) `id` from left to right.
    pub fn terminals_under(&self, id: NodeId) -> &[NodeId] {
        let (first, last) = self.nodes[id.0].positions;
        &self.terminals[first..=last]
    }

    /// Iterates over `id` and all its descendants in pre-order.
    pub fn preorder(&self, id: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![id],
        }
    }
}

/// A pre-order iterator over a subtree.
pub struct Preorder<'a> {
    tree: &'a ParseTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
