use searchql_ast::{Error, Node, Reason, WithErrorInfo};

/// Validates joiner/NOT placement and inserts implicit `AND` between
/// adjacent non-joiner siblings.
///
/// Rules enforced at every nesting level (top-level sequence, `Group`
/// children, and the value of a `Label` whose value is itself a `Group`):
///
/// - `NOT` must be the first node in its sequence or immediately follow a
///   joiner (`AND`/`OR`).
/// - A joiner must not immediately follow another joiner.
/// - `Return` nodes are never joined to their neighbours; no implicit `AND`
///   is inserted next to one.
///
/// Running the fixer twice over an already-fixed sequence is a no-op.
pub(crate) fn fix(nodes: Vec<Node>) -> searchql_ast::Result<Vec<Node>> {
    fix_sequence(nodes)
}

fn fix_sequence(nodes: Vec<Node>) -> searchql_ast::Result<Vec<Node>> {
    let nodes = fix_children(nodes)?;
    validate_placement(&nodes)?;
    Ok(insert_implicit_and(nodes))
}

/// Recurses into `Group` children and into `Label` values that are groups,
/// fixing them bottom-up before this level is validated.
fn fix_children(nodes: Vec<Node>) -> searchql_ast::Result<Vec<Node>> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Group(mut g) => {
                g.children = fix_sequence(g.children)?;
                Ok(Node::Group(g))
            }
            Node::Label(mut l) => {
                if let Node::Group(mut g) = *l.value {
                    g.children = fix_sequence(g.children)?;
                    l.value = Box::new(Node::Group(g));
                }
                Ok(Node::Label(l))
            }
            other => Ok(other),
        })
        .collect()
}

fn validate_placement(nodes: &[Node]) -> searchql_ast::Result<()> {
    let mut prev: Option<&Node> = None;
    for node in nodes {
        if node.is_not() {
            let ok = match prev {
                None => true,
                Some(p) => p.is_joiner(),
            };
            if !ok {
                return Err(Error::new(Reason::Joiner(
                    "NOT must be the first term or follow AND/OR".to_string(),
                ))
                .with_span(node.span()));
            }
        }
        if node.is_joiner() {
            if let Some(p) = prev {
                if p.is_joiner() {
                    return Err(Error::new(Reason::Joiner(
                        "a joiner cannot immediately follow another joiner".to_string(),
                    ))
                    .with_span(node.span()));
                }
            } else {
                return Err(Error::new(Reason::Joiner(
                    "a query cannot start with a joiner".to_string(),
                ))
                .with_span(node.span()));
            }
        }
        prev = Some(node);
    }
    Ok(())
}

/// Inserts a synthetic `AND` between any two adjacent siblings that are
/// neither already a joiner nor a `NOT`, and never next to a `Return`.
fn insert_implicit_and(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Some(prev) = out.last() {
            let needs_and = !prev.is_joiner()
                && !prev.is_not()
                && !node.is_joiner()
                && !node.is_not()
                && !prev.is_return()
                && !node.is_return();
            if needs_and {
                out.push(Node::synthetic_and());
            }
        }
        out.push(node);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchql_ast::{Span, Symbol};

    fn sym(value: &str) -> Node {
        Node::Symbol(Symbol {
            value: value.to_string(),
            span: Some(Span::new(0, value.len())),
        })
    }

    #[test]
    fn inserts_implicit_and_between_bare_symbols() {
        let fixed = fix(vec![sym("hello"), sym("world")]).unwrap();
        assert_eq!(fixed, vec![sym("hello"), Node::synthetic_and(), sym("world")]);
    }

    #[test]
    fn leaves_explicit_joiner_alone() {
        let fixed = fix(vec![sym("hello"), sym("OR"), sym("world")]).unwrap();
        assert_eq!(fixed, vec![sym("hello"), sym("OR"), sym("world")]);
    }

    #[test]
    fn leading_not_is_legal() {
        let fixed = fix(vec![sym("NOT"), sym("hello")]).unwrap();
        assert_eq!(fixed, vec![sym("NOT"), sym("hello")]);
    }

    #[test]
    fn not_after_bare_symbol_is_an_error() {
        let err = fix(vec![sym("hello"), sym("NOT"), sym("world")]).unwrap_err();
        assert!(matches!(err.reason, Reason::Joiner(_)));
    }

    #[test]
    fn double_joiner_is_an_error() {
        let err = fix(vec![sym("hello"), sym("AND"), sym("OR"), sym("world")]).unwrap_err();
        assert!(matches!(err.reason, Reason::Joiner(_)));
    }

    #[test]
    fn leading_joiner_is_an_error() {
        let err = fix(vec![sym("AND"), sym("hello")]).unwrap_err();
        assert!(matches!(err.reason, Reason::Joiner(_)));
    }

    #[test]
    fn fixer_is_idempotent() {
        let once = fix(vec![sym("hello"), sym("world")]).unwrap();
        let twice = fix(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
}
