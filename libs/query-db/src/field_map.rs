use std::collections::HashMap;

use query_core::{FilterKind, QueryError, QueryResult};
use sea_orm::EntityTrait;

/// Storage type of a queryable field. Decides which leaf filter the field accepts
/// and how filter values are coerced into `sea_orm::Value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Enum,
    I64,
    F64,
    Decimal,
    Bool,
    Uuid,
    DateTimeUtc,
    Date,
}

impl FieldKind {
    pub fn filter_kind(self) -> FilterKind {
        match self {
            FieldKind::String | FieldKind::Uuid => FilterKind::String,
            FieldKind::Enum => FilterKind::Enum,
            FieldKind::I64 | FieldKind::F64 | FieldKind::Decimal => FilterKind::Number,
            FieldKind::DateTimeUtc | FieldKind::Date => FilterKind::Date,
            FieldKind::Bool => FilterKind::Boolean,
        }
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, FieldKind::DateTimeUtc | FieldKind::Date)
    }
}

#[derive(Clone)]
pub struct Field<E: EntityTrait> {
    pub col: E::Column,
    pub kind: FieldKind,
    /// Known to the entity but never filtered, searched, sorted or grouped on.
    pub hidden: bool,
}

/// Whitelist of API field names for one entity.
///
/// Names are matched exactly; anything absent from the map is an unknown column
/// for filters, sorts and group-by alike. Hidden fields are forbidden columns
/// for all of them.
#[derive(Clone)]
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<String, Field<E>>,
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(mut self, api_name: impl Into<String>, col: E::Column, kind: FieldKind) -> Self {
        self.map.insert(
            api_name.into(),
            Field {
                col,
                kind,
                hidden: false,
            },
        );
        self
    }

    /// Register a field that must not be queried at all, such as a credential.
    pub fn insert_hidden(self, api_name: impl Into<String>, col: E::Column, kind: FieldKind) -> Self {
        let name = api_name.into();
        let mut this = self.insert(name.clone(), col, kind);
        this.hide(&name);
        this
    }

    /// Mark an already registered field as hidden. Unknown names are ignored.
    pub fn hide(&mut self, name: &str) {
        if let Some(field) = self.map.get_mut(name) {
            field.hidden = true;
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field<E>> {
        self.map.get(name)
    }

    /// Look up a field a client may query: unknown names and hidden fields are errors.
    pub fn resolve(&self, name: &str) -> QueryResult<&Field<E>> {
        match self.map.get(name) {
            None => Err(QueryError::unknown_column(name)),
            Some(field) if field.hidden => Err(QueryError::forbidden_column(name)),
            Some(field) => Ok(field),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
