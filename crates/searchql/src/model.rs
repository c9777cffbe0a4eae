use indexmap::IndexMap;

/// The column types the operator selector knows how to query against.
///
/// Mirrors the type-directed dispatch of the original schema: a field's
/// declared type picks the comparison operator, not the query token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    /// Full-text search column, queried with `to_tsvector`/`to_tsquery`.
    Fts,
    /// Opaque numeric identifier (Discord-style snowflake), compared with `=`.
    Snowflake,
    /// Plain integer column, compared with `=`.
    Int,
    /// Unix-epoch integer column, compared with `=` like `Int`; decoded to
    /// an egress-friendly ISO string by the Record Decoder.
    Timestamp,
    /// Boolean column, compared with `=`.
    Bool,
    /// Free text, matched with `ILIKE` (substring) or regex.
    Text,
    /// JSONB column. No query operator is defined for it; querying one
    /// directly is an [`searchql_ast::Reason::UnsupportedType`] error.
    Json,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
}

/// A foreign-key edge from this model to another, as `local.local_col =
/// foreign.foreign_col`. Registered in declaration order so a query that
/// touches several refs joins them in a predictable sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct RefDef {
    pub name: &'static str,
    pub target: fn() -> &'static Model,
    pub local_col: &'static str,
    pub foreign_col: &'static str,
    /// Whether `include_foreign_data` should always join and project this
    /// ref's target model, regardless of whether a WHERE clause touches it.
    pub always_join: bool,
}

/// A declarative description of one table: its columns, primary key, and
/// the refs a dotted field path may traverse.
///
/// Built once per model with the fluent builder and shared behind a
/// `'static` reference; see the `fixtures` module for worked examples.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub table: &'static str,
    pub pk: &'static str,
    pub fields: Vec<FieldDef>,
    pub refs: IndexMap<&'static str, RefDef>,
}

impl Model {
    pub fn new(table: &'static str, pk: &'static str) -> Self {
        Model {
            table,
            pk,
            fields: Vec::new(),
            refs: IndexMap::new(),
        }
    }

    pub fn field(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name,
            ty,
            nullable: false,
        });
        self
    }

    pub fn optional_field(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name,
            ty,
            nullable: true,
        });
        self
    }

    /// Shorthand for `.field(name, FieldType::Fts)`.
    pub fn fts(self, name: &'static str) -> Self {
        self.field(name, FieldType::Fts)
    }

    pub fn reference(
        mut self,
        name: &'static str,
        target: fn() -> &'static Model,
        local_col: &'static str,
        foreign_col: &'static str,
        always_join: bool,
    ) -> Self {
        self.refs.insert(
            name,
            RefDef {
                name,
                target,
                local_col,
                foreign_col,
                always_join,
            },
        );
        self
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn column(&self, field: &str) -> String {
        format!("{}.{}", self.table, field)
    }
}
