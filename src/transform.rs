use csv::StringRecord;
use thiserror::Error;

use crate::models::Field;

/// A row that could not be coerced into typed insert parameters. Always
/// confined to that row; the import loop drops it and moves on.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column {column}: {value:?} is not an integer")]
    BadInt { column: usize, value: String },

    #[error("column {column}: {value:?} is not a number")]
    BadReal { column: usize, value: String },
}

pub type Transform = fn(&StringRecord) -> Result<Vec<Field>, TransformError>;

/// Actor full names arrive split across two columns in the source dump.
pub fn actor(rec: &StringRecord) -> Result<Vec<Field>, TransformError> {
    let id = int(rec, 0)?;
    let name = format!("{} {}", text(rec, 1), text(rec, 2));
    Ok(vec![Field::Int(id), Field::Text(name)])
}

pub fn director(rec: &StringRecord) -> Result<Vec<Field>, TransformError> {
    let id = int(rec, 0)?;
    let name = format!("{} {}", text(rec, 1), text(rec, 2));
    Ok(vec![Field::Int(id), Field::Text(name)])
}

pub fn director_genre(rec: &StringRecord) -> Result<Vec<Field>, TransformError> {
    let id = int(rec, 0)?;
    Ok(vec![Field::Int(id), Field::Text(text(rec, 1).to_string())])
}

/// Year and rank are the two columns the dump leaves blank or marks "NULL";
/// both sentinels become an explicit absent value.
pub fn movie(rec: &StringRecord) -> Result<Vec<Field>, TransformError> {
    let id = int(rec, 0)?;
    let name = text(rec, 1).to_string();
    let year = opt_int(rec, 2)?;
    let rank = opt_real(rec, 3)?;
    Ok(vec![Field::Int(id), Field::Text(name), year, rank])
}

pub fn movie_genre(rec: &StringRecord) -> Result<Vec<Field>, TransformError> {
    let id = int(rec, 0)?;
    Ok(vec![Field::Int(id), Field::Text(text(rec, 1).to_string())])
}

pub fn role(rec: &StringRecord) -> Result<Vec<Field>, TransformError> {
    let actor_id = int(rec, 0)?;
    let movie_id = int(rec, 1)?;
    Ok(vec![Field::Int(actor_id), Field::Int(movie_id), Field::Text(text(rec, 2).to_string())])
}

// Leading whitespace is source noise; trailing whitespace is kept verbatim.
fn text(rec: &StringRecord, column: usize) -> &str {
    rec.get(column).map(str::trim_start).unwrap_or_default()
}

fn int(rec: &StringRecord, column: usize) -> Result<i32, TransformError> {
    let raw = text(rec, column);
    raw.parse().map_err(|_| TransformError::BadInt { column, value: raw.to_string() })
}

fn opt_int(rec: &StringRecord, column: usize) -> Result<Field, TransformError> {
    let raw = text(rec, column);
    if is_absent(raw) {
        return Ok(Field::Null);
    }
    raw.parse()
        .map(Field::Int)
        .map_err(|_| TransformError::BadInt { column, value: raw.to_string() })
}

fn opt_real(rec: &StringRecord, column: usize) -> Result<Field, TransformError> {
    let raw = text(rec, column);
    if is_absent(raw) {
        return Ok(Field::Null);
    }
    raw.parse()
        .map(Field::Real)
        .map_err(|_| TransformError::BadReal { column, value: raw.to_string() })
}

fn is_absent(raw: &str) -> bool {
    raw.is_empty() || raw == "NULL"
}
