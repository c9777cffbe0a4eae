use searchql_ast::{Error, Node, Reason};

use crate::model::FieldType;
use crate::value::SqlValue;

/// The right-hand side the compiler should emit after the operator: either
/// a bare placeholder (`$n`) or one wrapped in a SQL function call (FTS's
/// `to_tsquery($n)`).
pub struct Selected {
    pub op: &'static str,
    pub arg: SqlValue,
    pub rhs: String,
}

/// Text a plain [`Node::Symbol`] or [`Node::String`] carries, or `None` for
/// anything else (regexes bypass this selector entirely).
fn token_text(token: &Node) -> Option<(&str, bool)> {
    match token {
        Node::Symbol(s) => Some((s.value.as_str(), false)),
        Node::String(s) => Some((s.value.as_str(), true)),
        _ => None,
    }
}

fn parse_int(text: &str) -> Option<i64> {
    text.parse::<i64>().ok()
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Picks the comparison operator, bound argument, and placeholder text for
/// one field/token pair. `exact` is the `Label::exact` flag threaded down
/// from the enclosing label (`=` instead of `:`).
pub fn select(
    ty: FieldType,
    token: &Node,
    exact: bool,
    var_index: usize,
) -> searchql_ast::Result<Selected> {
    let placeholder = format!("${var_index}");
    let (text, is_string) = token_text(token).ok_or_else(|| {
        Error::new(Reason::UnsupportedType {
            field: format!("{ty:?}"),
            reason: "token is not a plain value".to_string(),
        })
    })?;

    match ty {
        FieldType::Fts => Ok(Selected {
            op: "@@",
            arg: SqlValue::Text(text.to_string()),
            rhs: format!("to_tsquery({placeholder})"),
        }),
        FieldType::Snowflake | FieldType::Int | FieldType::Timestamp => {
            let n = parse_int(text).ok_or_else(|| {
                Error::new(Reason::UnsupportedType {
                    field: format!("{ty:?}"),
                    reason: format!("`{text}` is not a valid integer"),
                })
            })?;
            Ok(Selected {
                op: "=",
                arg: SqlValue::Int(n),
                rhs: placeholder,
            })
        }
        FieldType::Bool => {
            let b = parse_bool(text).ok_or_else(|| {
                Error::new(Reason::UnsupportedType {
                    field: format!("{ty:?}"),
                    reason: format!("`{text}` is not a valid boolean"),
                })
            })?;
            Ok(Selected {
                op: "=",
                arg: SqlValue::Bool(b),
                rhs: placeholder,
            })
        }
        FieldType::Text => {
            if exact {
                return Ok(Selected {
                    op: "=",
                    arg: SqlValue::Text(text.to_string()),
                    rhs: placeholder,
                });
            }
            if is_string {
                return Ok(Selected {
                    op: "ILIKE",
                    arg: SqlValue::Text(text.to_string()),
                    rhs: placeholder,
                });
            }
            let pattern = if text.contains('*') {
                text.replace('*', "%")
            } else {
                format!("%{text}%")
            };
            Ok(Selected {
                op: "ILIKE",
                arg: SqlValue::Text(pattern),
                rhs: placeholder,
            })
        }
        FieldType::Json => Err(Error::new(Reason::UnsupportedType {
            field: "json".to_string(),
            reason: "jsonb columns cannot be queried directly".to_string(),
        })),
    }
}

/// Regex tokens bypass [`select`] entirely: `<col> ~[*] $n`.
pub fn regex_operator(case_insensitive: bool) -> &'static str {
    if case_insensitive {
        "~*"
    } else {
        "~"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchql_ast::{StringLit, Symbol};

    fn symbol(v: &str) -> Node {
        Node::Symbol(Symbol {
            value: v.to_string(),
            span: None,
        })
    }

    fn string(v: &str) -> Node {
        Node::String(StringLit {
            value: v.to_string(),
            span: None,
        })
    }

    #[test]
    fn bare_symbol_against_text_wraps_with_wildcards() {
        let s = select(FieldType::Text, &symbol("blob"), false, 1).unwrap();
        assert_eq!(s.op, "ILIKE");
        assert_eq!(s.arg, SqlValue::Text("%blob%".to_string()));
        assert_eq!(s.rhs, "$1");
    }

    #[test]
    fn quoted_string_against_text_is_not_wrapped() {
        let s = select(FieldType::Text, &string("blob"), false, 1).unwrap();
        assert_eq!(s.arg, SqlValue::Text("blob".to_string()));
    }

    #[test]
    fn explicit_wildcard_replaces_star() {
        let s = select(FieldType::Text, &symbol("bl*b"), false, 1).unwrap();
        assert_eq!(s.arg, SqlValue::Text("bl%b".to_string()));
    }

    #[test]
    fn exact_label_uses_equality_even_for_symbols() {
        let s = select(FieldType::Text, &symbol("blob"), true, 1).unwrap();
        assert_eq!(s.op, "=");
        assert_eq!(s.arg, SqlValue::Text("blob".to_string()));
    }

    #[test]
    fn snowflake_parses_integers() {
        let s = select(FieldType::Snowflake, &symbol("42"), false, 1).unwrap();
        assert_eq!(s.op, "=");
        assert_eq!(s.arg, SqlValue::Int(42));
    }

    #[test]
    fn timestamp_parses_as_integer_equality() {
        let s = select(FieldType::Timestamp, &symbol("1700000000"), false, 1).unwrap();
        assert_eq!(s.op, "=");
        assert_eq!(s.arg, SqlValue::Int(1700000000));
    }

    #[test]
    fn snowflake_rejects_non_numeric_tokens() {
        let err = select(FieldType::Snowflake, &symbol("nope"), false, 1).unwrap_err();
        assert!(matches!(err.reason, Reason::UnsupportedType { .. }));
    }

    #[test]
    fn fts_wraps_query_in_to_tsquery() {
        let s = select(FieldType::Fts, &symbol("yeet"), false, 1).unwrap();
        assert_eq!(s.op, "@@");
        assert_eq!(s.rhs, "to_tsquery($1)");
    }

    #[test]
    fn json_fields_cannot_be_queried() {
        let err = select(FieldType::Json, &symbol("x"), false, 1).unwrap_err();
        assert!(matches!(err.reason, Reason::UnsupportedType { .. }));
    }
}
