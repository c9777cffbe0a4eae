use std::collections::BTreeSet;

use enum_as_inner::EnumAsInner;

use crate::Span;

/// A single flag a [`Regex`] node may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegexFlag {
    /// `i` — case-insensitive match (`~*` instead of `~`).
    CaseInsensitive,
}

/// One node of the query AST.
///
/// Nodes are immutable after construction. The `exact` flag a [`Label`]
/// carries is never pushed down onto its value node by mutation; the
/// compiler threads it through recursion instead (see `searchql::compile`).
#[derive(Clone, Debug, PartialEq, Eq, EnumAsInner)]
pub enum Node {
    Symbol(Symbol),
    String(StringLit),
    Regex(Regex),
    Label(Label),
    Group(Group),
    Return(Return),
}

impl Node {
    pub fn span(&self) -> Option<Span> {
        match self {
            Node::Symbol(n) => n.span,
            Node::String(n) => n.span,
            Node::Regex(n) => n.span,
            Node::Label(n) => n.span,
            Node::Group(n) => n.span,
            Node::Return(n) => n.span,
        }
    }

    /// True for the two boolean joiner words `AND`/`OR`.
    pub fn is_joiner(&self) -> bool {
        matches!(self, Node::Symbol(s) if s.value == "AND" || s.value == "OR")
    }

    /// True for the unary `NOT` modifier.
    pub fn is_not(&self) -> bool {
        matches!(self, Node::Symbol(s) if s.value == "NOT")
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Node::Return(_))
    }

    pub(crate) fn synthetic_and() -> Node {
        Node::Symbol(Symbol {
            value: "AND".to_string(),
            span: None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub value: String,
    pub span: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringLit {
    pub value: String,
    pub span: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Regex {
    pub pattern: String,
    pub flags: BTreeSet<RegexFlag>,
    pub span: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub value: Box<Node>,
    pub exact: bool,
    pub span: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub children: Vec<Node>,
    pub span: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Return {
    pub fields: Vec<String>,
    pub span: Option<Span>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joiner_detection() {
        let and = Node::Symbol(Symbol {
            value: "AND".into(),
            span: None,
        });
        let not = Node::Symbol(Symbol {
            value: "NOT".into(),
            span: None,
        });
        let bare = Node::Symbol(Symbol {
            value: "hello".into(),
            span: None,
        });
        assert!(and.is_joiner());
        assert!(!and.is_not());
        assert!(not.is_not());
        assert!(!not.is_joiner());
        assert!(!bare.is_joiner() && !bare.is_not());
    }

    #[test]
    fn label_debug_shape() {
        let label = Node::Label(Label {
            name: "name".to_string(),
            value: Box::new(Node::Symbol(Symbol {
                value: "blob".to_string(),
                span: Some(crate::Span::new(5, 9)),
            })),
            exact: false,
            span: Some(crate::Span::new(0, 9)),
        });
        insta::assert_debug_snapshot!(label, @r###"
        Label(
            Label {
                name: "name",
                value: Symbol(
                    Symbol {
                        value: "blob",
                        span: Some(
                            5-9,
                        ),
                    },
                ),
                exact: false,
                span: Some(
                    0-9,
                ),
            },
        )
        "###);
    }
}
