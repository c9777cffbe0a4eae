use indexmap::IndexMap;
use searchql_ast::{Error, Reason};

use crate::model::{FieldType, Model};

/// The result of resolving a (possibly dotted) field path against a model:
/// the fully qualified column to filter or order by, its declared type, and
/// any joins that must be added to reach it.
pub struct Resolved {
    pub column: String,
    pub ty: FieldType,
    pub joins: IndexMap<&'static str, String>,
}

/// Resolves a dotted field path (`"guild.owner.name"`) against `model`,
/// walking declared refs one segment at a time and accumulating the join
/// clause needed for each hop.
///
/// A path with no dot is looked up directly among `model`'s own fields.
pub fn resolve_field(path: &str, model: &'static Model) -> searchql_ast::Result<Resolved> {
    match path.split_once('.') {
        Some((head, rest)) => {
            let reference = model.refs.get(head).ok_or_else(|| {
                Error::new(Reason::UnknownField {
                    path: path.to_string(),
                    model: model.table.to_string(),
                })
            })?;
            let target = (reference.target)();
            let resolved = resolve_field(rest, target)?;
            let on = format!(
                "{}.{} = {}.{}",
                model.table, reference.local_col, target.table, reference.foreign_col
            );
            // This hop's join belongs before any join the recursive lookup
            // added further down the path.
            let mut joins = IndexMap::new();
            joins.insert(target.table, on);
            joins.extend(resolved.joins);
            Ok(Resolved {
                column: resolved.column,
                ty: resolved.ty,
                joins,
            })
        }
        None => {
            let field = model.field_named(path).ok_or_else(|| {
                Error::new(Reason::UnknownField {
                    path: path.to_string(),
                    model: model.table.to_string(),
                })
            })?;
            let column = if field.ty == FieldType::Fts {
                format!("to_tsvector('english', {})", model.column(field.name))
            } else {
                model.column(field.name)
            };
            Ok(Resolved {
                column,
                ty: field.ty,
                joins: IndexMap::new(),
            })
        }
    }
}
