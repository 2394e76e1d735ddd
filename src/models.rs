/// One typed insert parameter produced by a row transform.
///
/// `Null` is the explicit absence marker for the optional movie columns; it
/// binds as SQL NULL, never as a coerced zero.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Int(i32),
    Real(f64),
    Text(String),
    Null,
}

impl From<Field> for sea_orm::Value {
    fn from(field: Field) -> Self {
        match field {
            Field::Int(v) => sea_orm::Value::Int(Some(v)),
            Field::Real(v) => sea_orm::Value::Double(Some(v)),
            Field::Text(v) => sea_orm::Value::String(Some(Box::new(v))),
            Field::Null => sea_orm::Value::Int(None),
        }
    }
}

/// Per-dataset import counters. Row-level failures never abort the run, so
/// these are the only record of what was dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Data rows the reader managed to tokenize (header excluded).
    pub read: u64,
    /// Lines the reader could not tokenize at all.
    pub malformed: u64,
    /// Rows below the dataset's minimum field count.
    pub short: u64,
    /// Rows that failed type coercion.
    pub failed_transform: u64,
    /// Rows rejected by the store, key collisions included.
    pub failed_insert: u64,
    pub inserted: u64,
}
