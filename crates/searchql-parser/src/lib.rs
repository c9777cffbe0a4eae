//! # searchql-parser
//!
//! Turns a labelled search DSL query string into a sequence of
//! [`searchql_ast::Node`]s.
//!
//! [`parse`] performs only the grammar-level parse. [`parse_and_fix`] also
//! runs the fixer, which validates joiner/`NOT` placement and inserts the
//! implicit `AND` between adjacent bare terms — this is the entry point the
//! `searchql` compiler crate uses.

mod fixer;
mod scanner;

use scanner::Scanner;
use searchql_ast::Node;

/// Parses `query` into its raw node sequence, without running the fixer.
pub fn parse(query: &str) -> searchql_ast::Result<Vec<Node>> {
    let nodes = Scanner::new(query).parse()?;
    log::trace!("parsed {} bytes into {} nodes", query.len(), nodes.len());
    Ok(nodes)
}

/// Parses `query` and then fixes up joiner placement, the canonical entry
/// point for anything that goes on to compile the result.
pub fn parse_and_fix(query: &str) -> searchql_ast::Result<Vec<Node>> {
    let fixed = fixer::fix(parse(query)?)?;
    log::debug!("fixed query into {} nodes", fixed.len());
    Ok(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchql_ast::{Node, Reason, RegexFlag};

    #[test]
    fn bare_words_become_symbols_joined_by_implicit_and() {
        let nodes = parse_and_fix("hello world").unwrap();
        let values: Vec<&str> = nodes
            .iter()
            .map(|n| match n {
                Node::Symbol(s) => s.value.as_str(),
                _ => panic!("expected symbol, got {n:?}"),
            })
            .collect();
        assert_eq!(values, vec!["hello", "AND", "world"]);
    }

    #[test]
    fn quoted_string_is_a_single_node() {
        let nodes = parse("\"hello world\"").unwrap();
        assert_eq!(nodes.len(), 1);
        let s = nodes[0].as_string().unwrap();
        assert_eq!(s.value, "hello world");
    }

    #[test]
    fn string_escapes_only_the_next_character() {
        let nodes = parse(r#""a\"b""#).unwrap();
        assert_eq!(nodes[0].as_string().unwrap().value, "a\"b");
    }

    #[test]
    fn colon_label_is_inexact() {
        let nodes = parse("name:bob").unwrap();
        let label = nodes[0].as_label().unwrap();
        assert_eq!(label.name, "name");
        assert!(!label.exact);
        assert_eq!(label.value.as_symbol().unwrap().value, "bob");
    }

    #[test]
    fn equals_label_is_exact() {
        let nodes = parse("id=42").unwrap();
        let label = nodes[0].as_label().unwrap();
        assert_eq!(label.name, "id");
        assert!(label.exact);
        assert_eq!(label.value.as_symbol().unwrap().value, "42");
    }

    #[test]
    fn label_value_can_be_a_quoted_string() {
        let nodes = parse(r#"name:"bob smith""#).unwrap();
        let label = nodes[0].as_label().unwrap();
        assert_eq!(label.value.as_string().unwrap().value, "bob smith");
    }

    #[test]
    fn regex_with_case_insensitive_flag() {
        let nodes = parse(r#"content:/.*\d me/i"#).unwrap();
        let label = nodes[0].as_label().unwrap();
        let regex = label.value.as_regex().unwrap();
        assert_eq!(regex.pattern, r".*\d me");
        assert!(regex.flags.contains(&RegexFlag::CaseInsensitive));
    }

    #[test]
    fn group_parses_nested_sequence() {
        let nodes = parse_and_fix("(hello OR world) AND goodbye").unwrap();
        assert_eq!(nodes.len(), 3);
        let group = nodes[0].as_group().unwrap();
        assert_eq!(group.children.len(), 3);
        assert!(nodes[1].is_joiner());
    }

    #[test]
    fn return_clause_collects_dotted_field_paths() {
        let nodes = parse("hello -> id author.name").unwrap();
        let ret = nodes[1].as_return().unwrap();
        assert_eq!(ret.fields, vec!["id", "author.name"]);
    }

    #[test]
    fn return_inside_group_is_not_joined_to_neighbours() {
        let nodes = parse_and_fix("(hello -> id)").unwrap();
        let group = nodes[0].as_group().unwrap();
        assert_eq!(group.children.len(), 2);
        assert!(group.children[1].is_return());
    }

    #[test]
    fn return_inside_group_does_not_swallow_trailing_sibling() {
        let nodes = parse_and_fix("(hello -> id) world").unwrap();
        assert_eq!(nodes.len(), 3);
        let group = nodes[0].as_group().unwrap();
        assert_eq!(group.children.len(), 2);
        assert!(nodes[1].is_joiner());
        assert_eq!(nodes[2].as_symbol().unwrap().value, "world");
    }

    #[test]
    fn fat_arrow_is_equivalent_to_thin_arrow() {
        let nodes = parse("hello => id").unwrap();
        assert!(nodes[1].is_return());
    }

    #[test]
    fn not_may_open_a_query() {
        let nodes = parse_and_fix("NOT hello").unwrap();
        assert!(nodes[0].is_not());
    }

    #[test]
    fn not_after_a_bare_term_is_a_joiner_error() {
        let err = parse_and_fix("hello NOT world").unwrap_err();
        assert!(matches!(err.reason, Reason::Joiner(_)));
    }

    #[test]
    fn unterminated_string_is_a_parse_error() {
        let err = parse("\"oops").unwrap_err();
        assert!(matches!(err.reason, Reason::Parse(_)));
    }

    #[test]
    fn unterminated_regex_is_a_parse_error() {
        let err = parse("/oops").unwrap_err();
        assert!(matches!(err.reason, Reason::Parse(_)));
    }

    #[test]
    fn unicode_query_does_not_panic_on_char_boundaries() {
        let nodes = parse_and_fix("caf\u{00e9} \u{1F600}").unwrap();
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn fixer_is_idempotent_through_the_public_api() {
        let once = parse_and_fix("hello world OR NOT bob").unwrap();
        let twice = fixer::fix(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    /// Compact, span-free shape of a node, so the snapshot below doesn't
    /// break on char-index churn.
    fn describe(node: &Node) -> String {
        match node {
            Node::Symbol(s) => format!("Symbol({})", s.value),
            Node::String(s) => format!("String({})", s.value),
            Node::Regex(r) => format!("Regex({}, {:?})", r.pattern, r.flags),
            Node::Label(l) => format!(
                "Label({}, exact={}, {})",
                l.name,
                l.exact,
                describe(&l.value)
            ),
            Node::Group(g) => {
                let inner: Vec<String> = g.children.iter().map(describe).collect();
                format!("Group([{}])", inner.join(", "))
            }
            Node::Return(r) => format!("Return({:?})", r.fields),
        }
    }

    #[test]
    fn snapshot_fixed_query_shape() {
        let nodes = parse_and_fix("guild.name:blob OR NOT id=1 -> id guild.name").unwrap();
        let shape: Vec<String> = nodes.iter().map(describe).collect();
        insta::assert_debug_snapshot!(shape, @r###"
        [
            "Label(guild.name, exact=false, Symbol(blob))",
            "Symbol(OR)",
            "Symbol(NOT)",
            "Label(id, exact=true, Symbol(1))",
            "Return([\"id\", \"guild.name\"])",
        ]
        "###);
    }
}
