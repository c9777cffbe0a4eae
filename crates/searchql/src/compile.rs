use indexmap::IndexMap;
use searchql_ast::{Error, Node, Reason, WithErrorInfo};

use crate::model::{FieldType, Model, RefDef};
use crate::operator::{self, Selected};
use crate::resolve::resolve_field;
use crate::value::SqlValue;

/// `ORDER BY` direction; only these two spellings are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OrderDir {
    #[default]
    Asc,
    Desc,
}

impl OrderDir {
    fn as_sql(self) -> &'static str {
        match self {
            OrderDir::Asc => "ASC",
            OrderDir::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> searchql_ast::Result<Self> {
        match s {
            "ASC" => Ok(OrderDir::Asc),
            "DESC" => Ok(OrderDir::Desc),
            other => Err(Error::new(Reason::OrderDirection(other.to_string()))),
        }
    }
}

/// One options struct, with documented defaults — callers never mutate
/// global state to affect compilation.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub order_by: Option<String>,
    pub order_dir: OrderDir,
    pub include_foreign_data: bool,
    /// If false, `return_fields` is always `None` even when the query has
    /// a `->` clause, mirroring the three-tuple/four-tuple distinction the
    /// original implementation makes at the call site.
    pub returns: bool,
    pub subquery_optimize: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub args: Vec<SqlValue>,
    pub models: Vec<&'static Model>,
    pub return_fields: Option<Vec<String>>,
}

/// The field a compiler recursion is currently bound to: its qualified
/// (or FTS-wrapped) column and effective type.
type BoundField<'a> = Option<(&'a str, FieldType)>;

struct State {
    var_index: usize,
    joins: IndexMap<&'static str, String>,
    args: Vec<SqlValue>,
    return_fields: Option<Vec<String>>,
    subquery_optimize: bool,
}

impl State {
    fn next_var(&mut self) -> usize {
        let v = self.var_index;
        self.var_index += 1;
        v
    }

    fn add_join(&mut self, table: &'static str, on: String) {
        self.joins.entry(table).or_insert(on);
    }
}

fn ref_on_clause(model: &Model, r: &RefDef, target: &Model) -> String {
    format!(
        "{}.{} = {}.{}",
        model.table, r.local_col, target.table, r.foreign_col
    )
}

/// Ordered chain of models a dotted field path traverses through, not
/// including `model` itself — `"guild.owner.name"` on `Message` yields
/// `[Guild, User]`.
fn ref_chain_models(
    path: &str,
    model: &'static Model,
) -> searchql_ast::Result<Vec<&'static Model>> {
    match path.split_once('.') {
        Some((head, rest)) => {
            let r = model.refs.get(head).ok_or_else(|| {
                Error::new(Reason::UnknownField {
                    path: path.to_string(),
                    model: model.table.to_string(),
                })
            })?;
            let target = (r.target)();
            let mut out = vec![target];
            out.extend(ref_chain_models(rest, target)?);
            Ok(out)
        }
        None => Ok(Vec::new()),
    }
}

/// Compiles a `query` string against `model` with `options`, producing SQL
/// text with `$1..$N` placeholders, the bound argument list, the ordered
/// model projection, and any requested `->` return fields.
pub fn compile_query(
    query: &str,
    model: &'static Model,
    options: CompileOptions,
) -> searchql_ast::Result<CompiledQuery> {
    let nodes = searchql_parser::parse_and_fix(query)?;
    log::debug!("compiling query against model {:?}", model.table);

    let mut state = State {
        var_index: 1,
        joins: IndexMap::new(),
        args: Vec::new(),
        return_fields: None,
        subquery_optimize: options.subquery_optimize,
    };

    let where_clause = compile_sequence(&nodes, model, None, false, &mut state)?;

    let mut models: Vec<&'static Model> = vec![model];

    if options.include_foreign_data {
        for r in model.refs.values() {
            if r.always_join {
                let target = (r.target)();
                state.add_join(target.table, ref_on_clause(model, r, target));
                if !models.iter().any(|m| m.table == target.table) {
                    models.push(target);
                }
            }
        }
        for r in model.refs.values() {
            let target = (r.target)();
            if state.joins.contains_key(target.table) && !models.iter().any(|m| m.table == target.table) {
                models.push(target);
            }
        }
    }

    if let Some(fields) = state.return_fields.clone() {
        for path in &fields {
            if path.contains('.') {
                let resolved = resolve_field(path, model)?;
                for (table, on) in resolved.joins {
                    state.add_join(table, on);
                }
                // The field's column only ends up in the SELECT list (and
                // so only reaches the decoder) if its owning model is in
                // the projection too, not just joined.
                for hop in ref_chain_models(path, model)? {
                    if !models.iter().any(|m| m.table == hop.table) {
                        models.push(hop);
                    }
                }
            }
        }
    }

    let mut order_sql = String::new();
    if let Some(order_by) = &options.order_by {
        let resolved = resolve_field(order_by, model)?;
        for (table, on) in resolved.joins {
            state.add_join(table, on);
        }
        order_sql = format!(" ORDER BY {} {}", resolved.column, options.order_dir.as_sql());
    }

    let joins_sql: String = state
        .joins
        .iter()
        .map(|(table, on)| format!(" JOIN {table} ON {on}"))
        .collect();

    let where_sql = if where_clause.is_empty() {
        String::new()
    } else {
        format!(" WHERE {where_clause}")
    };

    let mut suffix = String::new();
    if let Some(limit) = options.limit {
        if limit > 0 {
            suffix.push_str(&format!(" LIMIT {limit}"));
            if let Some(offset) = options.offset {
                if offset > 0 {
                    suffix.push_str(&format!(" OFFSET {offset}"));
                }
            }
        }
    }

    let select_list = select_columns(&models);
    let sql = format!(
        "SELECT {select_list} FROM {}{joins_sql}{where_sql}{order_sql}{suffix}",
        model.table
    );

    let return_fields = if options.returns { state.return_fields } else { None };

    Ok(CompiledQuery {
        sql,
        args: state.args,
        models,
        return_fields,
    })
}

fn select_columns(models: &[&'static Model]) -> String {
    if models.len() == 1 {
        format!("{}.*", models[0].table)
    } else {
        models
            .iter()
            .flat_map(|m| m.fields.iter().map(|f| m.column(f.name)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn compile_sequence(
    nodes: &[Node],
    model: &'static Model,
    field: BoundField<'_>,
    exact: bool,
    state: &mut State,
) -> searchql_ast::Result<String> {
    let mut fragments = Vec::new();
    for node in nodes {
        if let Some(fragment) = compile_node(node, model, field, exact, state)? {
            fragments.push(fragment);
        }
    }
    Ok(fragments.join(" "))
}

fn compile_node(
    node: &Node,
    model: &'static Model,
    field: BoundField<'_>,
    exact: bool,
    state: &mut State,
) -> searchql_ast::Result<Option<String>> {
    match node {
        Node::Symbol(s) if node.is_joiner() => Ok(Some(s.value.clone())),
        Node::Symbol(_) if node.is_not() => Ok(Some("NOT".to_string())),
        Node::Symbol(s) => match field {
            Some((column, ty)) => compile_value_token(node, column, ty, exact, state).map(Some),
            None => compile_ref_traversal(&s.value, model, state).map(Some),
        },
        Node::String(_) => match field {
            Some((column, ty)) => compile_value_token(node, column, ty, exact, state).map(Some),
            None => {
                let value = node.as_string().unwrap().value.clone();
                Err(Error::new(Reason::UnlabeledSymbol(value)).with_span(node.span()))
            }
        },
        Node::Regex(r) => match field {
            Some((column, _ty)) => {
                let var = state.next_var();
                let op = operator::regex_operator(r.flags.contains(&searchql_ast::RegexFlag::CaseInsensitive));
                state.args.push(SqlValue::Text(r.pattern.clone()));
                Ok(Some(format!("{column} {op} ${var}")))
            }
            None => Err(Error::new(Reason::UnlabeledSymbol(r.pattern.clone())).with_span(node.span())),
        },
        Node::Label(l) => {
            let resolved = resolve_field(&l.name, model)?;
            for (table, on) in &resolved.joins {
                state.add_join(*table, on.clone());
            }
            if state.subquery_optimize {
                if let Some(sub) = try_subquery(model, &l.name, &l.value, l.exact, state)? {
                    return Ok(Some(sub));
                }
            }
            let inner = compile_node(
                &l.value,
                model,
                Some((resolved.column.as_str(), resolved.ty)),
                l.exact,
                state,
            )?;
            Ok(inner)
        }
        Node::Group(g) => {
            let inner = compile_sequence(&g.children, model, field, exact, state)?;
            Ok(Some(format!("({inner})")))
        }
        Node::Return(r) => {
            state.return_fields = Some(r.fields.clone());
            Ok(None)
        }
    }
}

fn compile_value_token(
    token: &Node,
    column: &str,
    ty: FieldType,
    exact: bool,
    state: &mut State,
) -> searchql_ast::Result<String> {
    let var = state.next_var();
    let Selected { op, arg, rhs } = operator::select(ty, token, exact, var)?;
    state.args.push(arg);
    Ok(format!("{column} {op} {rhs}"))
}

/// A bare symbol with no bound field is a reference traversal: `guild`
/// alone on `Message` joins the `guild` ref and contributes `true`.
fn compile_ref_traversal(
    name: &str,
    model: &'static Model,
    state: &mut State,
) -> searchql_ast::Result<String> {
    let r = model
        .refs
        .get(name)
        .ok_or_else(|| Error::new(Reason::UnlabeledSymbol(name.to_string())))?;
    let target = (r.target)();
    state.add_join(target.table, ref_on_clause(model, r, target));
    Ok("true".to_string())
}

/// One level of subquery rewrite (§4.5): `name.rest` becomes an `IN
/// (SELECT ...)` against the foreign table instead of a join, when enabled.
/// Deeper (multiply-dotted) paths are left to fall through to a join.
fn try_subquery(
    model: &'static Model,
    path: &str,
    value: &Node,
    exact: bool,
    state: &mut State,
) -> searchql_ast::Result<Option<String>> {
    let Some((head, rest)) = path.split_once('.') else {
        return Ok(None);
    };
    if rest.contains('.') {
        return Ok(None);
    }
    let Some(r) = model.refs.get(head) else {
        return Ok(None);
    };
    let target = (r.target)();
    let Some(target_field) = target.field_named(rest) else {
        return Ok(None);
    };

    // The subquery rewrite replaces the join this label's resolution
    // already queued; undo it.
    state.joins.shift_remove(target.table);

    let var = state.next_var();
    let Selected { op, arg, rhs } = operator::select(target_field.ty, value, exact, var)?;
    state.args.push(arg);
    Ok(Some(format!(
        "{}.{} IN (SELECT {} FROM {} WHERE {} {op} {rhs})",
        model.table, r.local_col, r.foreign_col, target.table, target_field.name
    )))
}
