use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::data::error::{InvalidProjection, InvalidSort};
use crate::data::matcher::{compare_values, lookup};
use crate::{Record, Result, Select, Sort, ID_FIELD};

/// A parsed field projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Keep only these paths, plus `_id` unless `with_id` is false.
    Include { paths: Vec<String>, with_id: bool },
    /// Drop these paths.
    Exclude(Vec<String>),
}

impl Projection {
    /// Returns `None` when the select names no fields.
    pub fn parse(select: &Select) -> Result<Option<Projection>> {
        let mut fields: Vec<(String, bool)> = Vec::new();
        match select {
            Select::Fields(spec) => {
                for token in spec.split_whitespace() {
                    if let Some(path) = token.strip_prefix('-') {
                        fields.push((path.to_string(), false));
                    } else {
                        let path = token.strip_prefix('+').unwrap_or(token);
                        fields.push((path.to_string(), true));
                    }
                }
            }
            Select::Spec(spec) => {
                for (path, flag) in spec {
                    let include = match flag {
                        Value::Bool(b) => *b,
                        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
                        other => {
                            return Err(InvalidProjection(format!(
                                "unsupported value {} for field {}",
                                other, path
                            ))
                            .into());
                        }
                    };
                    fields.push((path.clone(), include));
                }
            }
        }

        if fields.iter().any(|(path, _)| path.is_empty()) {
            return Err(InvalidProjection("empty field name".to_string()).into());
        }
        if fields.is_empty() {
            return Ok(None);
        }

        let with_id = !fields.iter().any(|(path, include)| path == ID_FIELD && !include);
        let others: Vec<&(String, bool)> = fields.iter().filter(|(path, _)| path != ID_FIELD).collect();
        let includes = others.iter().filter(|(_, include)| *include).count();

        if includes > 0 && includes < others.len() {
            return Err(InvalidProjection("cannot mix inclusion and exclusion".to_string()).into());
        }

        if includes > 0 {
            Ok(Some(Projection::Include {
                paths: others.into_iter().map(|(path, _)| path.clone()).collect(),
                with_id,
            }))
        } else {
            let mut paths: Vec<String> = others.into_iter().map(|(path, _)| path.clone()).collect();
            if !with_id {
                paths.push(ID_FIELD.to_string());
            }
            Ok(Some(Projection::Exclude(paths)))
        }
    }

    pub fn apply(&self, record: &Record) -> Record {
        match self {
            Projection::Include { paths, with_id } => {
                let mut projected = Record::new();
                if *with_id {
                    if let Some(id) = record.get(ID_FIELD) {
                        projected.insert(ID_FIELD.to_string(), id.clone());
                    }
                }
                for path in paths {
                    let segments: Vec<&str> = path.split('.').collect();
                    copy_path(record, &mut projected, &segments);
                }
                projected
            }
            Projection::Exclude(paths) => {
                let mut projected = record.clone();
                for path in paths {
                    let segments: Vec<&str> = path.split('.').collect();
                    remove_path(&mut projected, &segments);
                }
                projected
            }
        }
    }
}

fn copy_path(source: &Record, target: &mut Record, segments: &[&str]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let Some(value) = source.get(*head) else {
        return;
    };

    if rest.is_empty() {
        target.insert(head.to_string(), value.clone());
        return;
    }

    if let Value::Object(inner) = value {
        let entry = target
            .entry(head.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(inner_target) = entry {
            copy_path(inner, inner_target, rest);
        }
    }
}

fn remove_path(record: &mut Record, segments: &[&str]) {
    match segments {
        [] => {}
        [last] => {
            record.remove(*last);
        }
        [head, rest @ ..] => {
            if let Some(Value::Object(inner)) = record.get_mut(*head) {
                remove_path(inner, rest);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Ordered list of sort keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortKeys(pub Vec<(String, SortDirection)>);

impl SortKeys {
    pub fn parse(sort: &Sort) -> Result<SortKeys> {
        let mut keys = Vec::new();
        match sort {
            Sort::Fields(spec) => {
                for token in spec.split_whitespace() {
                    let (path, direction) = match token.strip_prefix('-') {
                        Some(path) => (path, SortDirection::Descending),
                        None => (token.strip_prefix('+').unwrap_or(token), SortDirection::Ascending),
                    };
                    if path.is_empty() {
                        return Err(InvalidSort("empty field name".to_string()).into());
                    }
                    keys.push((path.to_string(), direction));
                }
            }
            Sort::Spec(spec) => {
                for (path, direction) in spec {
                    keys.push((path.clone(), parse_direction(path, direction)?));
                }
            }
        }
        Ok(SortKeys(keys))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compares two records key by key; a missing field sorts as null.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for (path, direction) in &self.0 {
            let left = lookup(a, path).unwrap_or(&Value::Null);
            let right = lookup(b, path).unwrap_or(&Value::Null);
            let ord = match direction {
                SortDirection::Ascending => compare_values(left, right),
                SortDirection::Descending => compare_values(right, left),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

fn parse_direction(path: &str, direction: &Value) -> Result<SortDirection> {
    match direction {
        Value::Number(n) if n.as_f64() == Some(1.0) => Ok(SortDirection::Ascending),
        Value::Number(n) if n.as_f64() == Some(-1.0) => Ok(SortDirection::Descending),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(InvalidSort(format!("invalid direction {} for {}", s, path)).into()),
        },
        other => Err(InvalidSort(format!("invalid direction {} for {}", other, path)).into()),
    }
}
