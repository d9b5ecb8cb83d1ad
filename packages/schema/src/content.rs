//! # Content Grammar
//!
//! Each node kind declares the children it accepts as a sequence of terms,
//! every term being a target (a kind, a group, or a set of kinds) with a
//! quantifier. Terms are matched greedily in order.

use crate::node::{Node, NodeKind};
use std::fmt;

/// Node groups referenced by content rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Block,
    Inline,
}

impl Group {
    pub fn name(self) -> &'static str {
        match self {
            Group::Block => "block",
            Group::Inline => "inline",
        }
    }
}

impl NodeKind {
    /// Groups a kind belongs to
    pub fn groups(self) -> &'static [Group] {
        match self {
            NodeKind::Paragraph
            | NodeKind::Blockquote
            | NodeKind::HorizontalRule
            | NodeKind::Heading
            | NodeKind::CodeBlock
            | NodeKind::Div
            | NodeKind::Table => &[Group::Block],
            NodeKind::Text | NodeKind::Image | NodeKind::HardBreak | NodeKind::Span => {
                &[Group::Inline]
            }
            NodeKind::Doc | NodeKind::TableRow | NodeKind::TableCell | NodeKind::TableHeader => &[],
        }
    }

    pub fn in_group(self, group: Group) -> bool {
        self.groups().contains(&group)
    }

    pub fn is_inline(self) -> bool {
        self.in_group(Group::Inline)
    }
}

/// What a content term matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Kind(NodeKind),
    Group(Group),
    AnyOf(&'static [NodeKind]),
}

impl Target {
    pub fn matches(&self, kind: NodeKind) -> bool {
        match self {
            Target::Kind(k) => *k == kind,
            Target::Group(g) => kind.in_group(*g),
            Target::AnyOf(kinds) => kinds.contains(&kind),
        }
    }

    /// Kinds this target can produce, in registry order
    pub fn candidates(&self) -> impl Iterator<Item = NodeKind> + '_ {
        NodeKind::ALL.into_iter().filter(move |kind| self.matches(*kind))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Kind(k) => f.write_str(k.name()),
            Target::Group(g) => f.write_str(g.name()),
            Target::AnyOf(kinds) => {
                let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
                write!(f, "({})", names.join(" | "))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Quantifier {
    pub fn min(self) -> usize {
        match self {
            Quantifier::One | Quantifier::OneOrMore => 1,
            Quantifier::Optional | Quantifier::ZeroOrMore => 0,
        }
    }

    pub fn max(self) -> usize {
        match self {
            Quantifier::One | Quantifier::Optional => 1,
            Quantifier::ZeroOrMore | Quantifier::OneOrMore => usize::MAX,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Quantifier::One => "",
            Quantifier::Optional => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub target: Target,
    pub quantifier: Quantifier,
}

/// Ordered sequence of terms; no terms means a leaf node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentRule {
    pub terms: Vec<Term>,
}

impl ContentRule {
    pub fn leaf() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn zero_or_more(target: Target) -> Self {
        Self::single(target, Quantifier::ZeroOrMore)
    }

    pub fn one_or_more(target: Target) -> Self {
        Self::single(target, Quantifier::OneOrMore)
    }

    fn single(target: Target, quantifier: Quantifier) -> Self {
        Self {
            terms: vec![Term { target, quantifier }],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn accepts_empty(&self) -> bool {
        self.terms.iter().all(|t| t.quantifier.min() == 0)
    }

    /// Whether some term accepts the kind, ignoring position
    pub fn allows(&self, kind: NodeKind) -> bool {
        self.terms.iter().any(|t| t.target.matches(kind))
    }

    /// Check a child list against the rule
    pub fn validate(&self, content: &[Node]) -> Result<(), String> {
        let mut index = 0;

        for term in &self.terms {
            let mut count = 0;
            while index < content.len()
                && count < term.quantifier.max()
                && term.target.matches(content[index].kind)
            {
                index += 1;
                count += 1;
            }
            if count < term.quantifier.min() {
                return Err(format!("expected {}{}", term.target, term.quantifier.suffix()));
            }
        }

        match content.get(index) {
            Some(extra) => Err(format!("unexpected {} in {}", extra.kind, self)),
            None => Ok(()),
        }
    }

    /// Match the content and insert missing required children produced by
    /// `filler`. Returns `None` when the content does not fit the rule or a
    /// required child cannot be produced.
    pub fn fill<F>(&self, content: Vec<Node>, filler: F) -> Option<Vec<Node>>
    where
        F: Fn(&Target) -> Option<Node>,
    {
        let mut out = Vec::with_capacity(content.len() + 1);
        let mut rest = content.into_iter().peekable();

        for term in &self.terms {
            let mut count = 0;
            while count < term.quantifier.max()
                && rest.peek().map_or(false, |n| term.target.matches(n.kind))
            {
                out.extend(rest.next());
                count += 1;
            }
            while count < term.quantifier.min() {
                out.push(filler(&term.target)?);
                count += 1;
            }
        }

        if rest.peek().is_some() {
            return None;
        }
        Some(out)
    }
}

impl fmt::Display for ContentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("leaf");
        }
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|t| format!("{}{}", t.target, t.quantifier.suffix()))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Attrs;

    fn node(kind: NodeKind) -> Node {
        Node::raw(kind, Attrs::new(), vec![])
    }

    #[test]
    fn test_block_plus_rejects_empty() {
        let rule = ContentRule::one_or_more(Target::Group(Group::Block));
        assert!(rule.validate(&[]).is_err());
        assert!(rule.validate(&[node(NodeKind::Paragraph), node(NodeKind::Table)]).is_ok());
        assert!(!rule.accepts_empty());
    }

    #[test]
    fn test_unexpected_child_is_reported() {
        let rule = ContentRule::one_or_more(Target::Kind(NodeKind::TableRow));
        let err = rule
            .validate(&[node(NodeKind::TableRow), node(NodeKind::Paragraph)])
            .unwrap_err();
        assert!(err.contains("paragraph"));
    }

    #[test]
    fn test_fill_inserts_missing_required_child() {
        let rule = ContentRule::one_or_more(Target::Group(Group::Block));
        let filled = rule.fill(vec![], |_| Some(node(NodeKind::Paragraph))).unwrap();
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].kind, NodeKind::Paragraph);

        // Nothing to fill with
        assert!(rule.fill(vec![], |_| None).is_none());
    }

    #[test]
    fn test_fill_rejects_misplaced_content() {
        let rule = ContentRule::zero_or_more(Target::Group(Group::Inline));
        assert!(rule.fill(vec![node(NodeKind::Table)], |_| None).is_none());
    }

    #[test]
    fn test_rule_display() {
        const CELLS: &[NodeKind] = &[NodeKind::TableCell, NodeKind::TableHeader];
        let rule = ContentRule::one_or_more(Target::AnyOf(CELLS));
        assert_eq!(rule.to_string(), "(table_cell | table_header)+");
        assert_eq!(ContentRule::leaf().to_string(), "leaf");
    }
}
