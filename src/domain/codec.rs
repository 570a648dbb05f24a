//! Field identity encoding.
//!
//! A field is identified by a [`CompoundKey`]: either a literal terminal path
//! (`schema.table.column`) or a path positioned in the pipeline grid, whose
//! string form is `"{level}-{index}:{path}"`. Decoding a key yields the
//! [`TableId`] the field belongs to; positioned fields of the same literal
//! table at different grid positions belong to distinct tables.

use crate::domain::error::MalformedIdentifierError;
use crate::domain::record::FieldRef;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// `{level}-{index}` prefix of a positioned key.
fn position_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)-(\d+)$").expect("position prefix regex"))
}

/// Trailing `_{level}-{order}` of a positioned table identity.
fn hierarchy_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_(\d+)-(\d+)$").expect("hierarchy suffix regex"))
}

/// Grid position of a non-final field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub level: u32,
    pub index: u32,
}

/// Identity of a field, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompoundKey {
    Final(String),
    Positioned { position: Position, path: String },
}

impl CompoundKey {
    /// The dotted field path, without any grid position.
    pub fn path(&self) -> &str {
        match self {
            CompoundKey::Final(path) => path,
            CompoundKey::Positioned { path, .. } => path,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            CompoundKey::Final(_) => None,
            CompoundKey::Positioned { position, .. } => Some(*position),
        }
    }
}

impl fmt::Display for CompoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompoundKey::Final(path) => write!(f, "{path}"),
            CompoundKey::Positioned { position, path } => {
                write!(f, "{}-{}:{}", position.level, position.index, path)
            }
        }
    }
}

impl FromStr for CompoundKey {
    type Err = MalformedIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((prefix, path)) = s.split_once(':') else {
            return Ok(CompoundKey::Final(s.to_string()));
        };
        let caps = position_prefix_regex()
            .captures(prefix)
            .ok_or_else(|| MalformedIdentifierError::new(s, "position prefix is not `level-index`"))?;
        let level = caps[1]
            .parse()
            .map_err(|_| MalformedIdentifierError::new(s, "level out of range"))?;
        let index = caps[2]
            .parse()
            .map_err(|_| MalformedIdentifierError::new(s, "index out of range"))?;
        Ok(CompoundKey::Positioned {
            position: Position { level, index },
            path: path.to_string(),
        })
    }
}

/// Identity of a table (one graph node), compared by its rendered id
/// `{name}` or `{name}_{level}-{index}`. A literal table whose name already
/// ends in a grid suffix is the same node as the positioned table it spells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableId(String);

impl TableId {
    pub fn literal(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn positioned(name: impl AsRef<str>, level: u32, index: u32) -> Self {
        Self(format!("{}_{}-{}", name.as_ref(), level, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Level and order of this table in the pipeline grid, read from the id
    /// suffix. Tables without one sit on the deepest tier.
    pub fn hierarchy(&self, max_level: u32) -> Hierarchy {
        hierarchy_of(&self.0, max_level)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded field: the table it belongs to and its column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldLocation {
    pub table: TableId,
    pub field: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub level: u32,
    pub order: u32,
}

pub fn encode(field: &FieldRef) -> CompoundKey {
    if field.is_final {
        CompoundKey::Final(field.field_name.clone())
    } else {
        CompoundKey::Positioned {
            position: Position {
                level: field.level,
                index: field.index,
            },
            path: field.field_name.clone(),
        }
    }
}

/// Resolve a key to its table and field. The path must have at least three
/// dot-separated segments; the second is the table, the third the field.
pub fn decode(key: &CompoundKey) -> Result<FieldLocation, MalformedIdentifierError> {
    let segments: Vec<&str> = key.path().split('.').collect();
    if segments.len() < 3 {
        return Err(MalformedIdentifierError::new(
            key.to_string(),
            format!("expected `schema.table.field`, found {} segment(s)", segments.len()),
        ));
    }
    let (table, field) = (segments[1], segments[2]);
    if table.is_empty() {
        return Err(MalformedIdentifierError::new(key.to_string(), "empty table name"));
    }
    if field.is_empty() {
        return Err(MalformedIdentifierError::new(key.to_string(), "empty field name"));
    }

    Ok(FieldLocation {
        table: match key.position() {
            Some(p) => TableId::positioned(table, p.level, p.index),
            None => TableId::literal(table),
        },
        field: field.to_string(),
    })
}

/// Hierarchy of a table identity given in string form.
pub fn hierarchy_of(key: &str, max_level: u32) -> Hierarchy {
    let parsed = hierarchy_suffix_regex().captures(key).and_then(|caps| {
        let level = caps[1].parse().ok()?;
        let order = caps[2].parse().ok()?;
        Some(Hierarchy { level, order })
    });
    parsed.unwrap_or(Hierarchy {
        level: max_level,
        order: 0,
    })
}
