use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::SchemaError;

// ---------------------------------------------------------------------------
// Value – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a CSV/Parquet source
/// produces. Used as a key in `BTreeMap` / `BTreeSet`, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numeric columns sort by magnitude; ties keep integers first.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl Value {
    /// Interpret the value as an `f64` when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }
}

static NULL: Value = Value::Null;

// ---------------------------------------------------------------------------
// Row – one record of a table
// ---------------------------------------------------------------------------

/// A single record: column_name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub values: BTreeMap<String, Value>,
}

impl Row {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Row { values }
    }

    /// The value in `column`, or `Null` when the row has no such cell.
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – an immutable in-memory data frame
// ---------------------------------------------------------------------------

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Categorical,
    Numeric,
}

/// A loaded (or derived) table with pre-computed column indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in source order.
    pub column_names: Vec<String>,
    /// Semantic type of every column.
    pub column_types: BTreeMap<String, ColumnType>,
    /// All records.
    pub rows: Vec<Row>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
}

impl Table {
    /// Build a table, inferring each column's type from its values.
    ///
    /// A column is numeric when every non-null cell is an integer or float.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        let column_types = column_names
            .iter()
            .map(|col| {
                let numeric = rows.iter().map(|r| r.get(col)).all(|v| v.is_null() || v.is_numeric());
                let ty = if numeric {
                    ColumnType::Numeric
                } else {
                    ColumnType::Categorical
                };
                (col.clone(), ty)
            })
            .collect();
        Self::with_types(column_names, column_types, rows)
    }

    /// Build a table with explicitly known column types.
    pub fn with_types(
        column_names: Vec<String>,
        column_types: BTreeMap<String, ColumnType>,
        rows: Vec<Row>,
    ) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = column_names
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();
        for row in &rows {
            for (col, set) in unique_values.iter_mut() {
                set.insert(row.get(col).clone());
            }
        }
        Table {
            column_names,
            column_types,
            rows,
            unique_values,
        }
    }

    /// A new table holding the rows at `indices`, with this table's columns.
    pub fn select(&self, indices: &[usize]) -> Table {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Table::with_types(self.column_names.clone(), self.column_types.clone(), rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_types.contains_key(column)
    }

    /// Fail with [`SchemaError::MissingColumn`] unless `column` exists.
    pub fn require(&self, column: &str) -> Result<(), SchemaError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(SchemaError::missing(column))
        }
    }

    pub fn column_type(&self, column: &str) -> Result<ColumnType, SchemaError> {
        self.column_types
            .get(column)
            .copied()
            .ok_or_else(|| SchemaError::missing(column))
    }

    /// Cells of `column`, one per row.
    pub fn values(&self, column: &str) -> Result<Vec<&Value>, SchemaError> {
        self.require(column)?;
        Ok(self.rows.iter().map(|r| r.get(column)).collect())
    }

    /// Cells of a numeric column as `f64`, with `NaN` for missing values.
    pub fn numeric(&self, column: &str) -> Result<Vec<f64>, SchemaError> {
        if self.column_type(column)? != ColumnType::Numeric {
            return Err(SchemaError::not_numeric(column));
        }
        Ok(self
            .rows
            .iter()
            .map(|r| r.get(column).as_f64().unwrap_or(f64::NAN))
            .collect())
    }

    /// Smallest and largest non-missing value of a numeric column.
    pub fn numeric_bounds(&self, column: &str) -> Result<Option<(f64, f64)>, SchemaError> {
        let bounds = self
            .numeric(column)?
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        Ok(bounds)
    }

    /// Numeric column names in source order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.column_names
            .iter()
            .filter(|c| self.column_types.get(*c) == Some(&ColumnType::Numeric))
            .map(String::as_str)
            .collect()
    }
}
