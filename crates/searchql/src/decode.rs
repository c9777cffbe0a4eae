use searchql_ast::{Error, Reason};

use crate::model::{FieldType, Model};
use crate::value::SqlValue;

/// One decoded row: a flat, ordered vector of column values spanning every
/// model in a compiled query's projection, in the same order the
/// projection's SELECT list lists them.
///
/// Walks `models` in order, consuming `fields.len()` columns per model.
pub fn decode_models(
    row: &[SqlValue],
    models: &[&'static Model],
) -> searchql_ast::Result<Vec<Vec<(&'static str, SqlValue)>>> {
    let mut offset = 0;
    let mut out = Vec::with_capacity(models.len());
    for model in models {
        let width = model.fields.len();
        let slice = row.get(offset..offset + width).ok_or_else(|| {
            Error::new(Reason::Parse(format!(
                "row has only {} columns, expected at least {}",
                row.len(),
                offset + width
            )))
        })?;
        let mut fields = Vec::with_capacity(width);
        for (field, value) in model.fields.iter().zip(slice) {
            fields.push((field.name, egress(value.clone(), field.ty)));
        }
        out.push(fields);
        offset += width;
    }
    Ok(out)
}

/// Converts a raw decoded value into its egress form: snowflakes and
/// timestamps are stringified, everything else passes through unchanged.
fn egress(value: SqlValue, ty: FieldType) -> SqlValue {
    match (ty, value) {
        (FieldType::Snowflake, SqlValue::Int(i)) => SqlValue::Text(i.to_string()),
        (FieldType::Timestamp, SqlValue::Int(i)) => SqlValue::Text(i.to_string()),
        (_, value) => value,
    }
}

/// Given a compiled query's `return_fields` and its `models` projection,
/// resolves each dotted field path to the model that owns it and the
/// column offset within the flat row, then produces an ordered
/// `(field_name, value)` list in egress form.
///
/// Only fields belonging to a model already present in `models` can be
/// decoded this way — a `->` clause referencing a model that was not
/// joined is a caller error the compiler should have already rejected
/// via its own field resolution.
pub fn decode_return_fields(
    row: &[SqlValue],
    models: &[&'static Model],
    return_fields: &[String],
) -> searchql_ast::Result<Vec<(String, SqlValue)>> {
    let decoded = decode_models(row, models)?;
    let mut out = Vec::with_capacity(return_fields.len());
    for path in return_fields {
        let (model_idx, field_name) = locate(models, path)?;
        let value = decoded[model_idx]
            .iter()
            .find(|(name, _)| *name == field_name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| {
                Error::new(Reason::UnknownField {
                    path: path.clone(),
                    model: models[model_idx].table.to_string(),
                })
            })?;
        out.push((path.clone(), value));
    }
    Ok(out)
}

/// Resolves a dotted return path to (index into `models`, bare field
/// name), e.g. `"guild.name"` against `[Message, Guild]` → `(1, "name")`.
fn locate(models: &[&'static Model], path: &str) -> searchql_ast::Result<(usize, &str)> {
    match path.rsplit_once('.') {
        None => {
            // A bare field name belongs to the root (first) model.
            Ok((0, path))
        }
        Some((head, field)) => {
            let ref_table = head.rsplit('.').next().unwrap_or(head);
            let root = models[0];
            let target_table = root
                .refs
                .get(ref_table)
                .map(|r| (r.target)().table)
                .unwrap_or(ref_table);
            let idx = models
                .iter()
                .position(|m| m.table == target_table)
                .ok_or_else(|| {
                    Error::new(Reason::UnknownField {
                        path: path.to_string(),
                        model: root.table.to_string(),
                    })
                })?;
            Ok((idx, field))
        }
    }
}
