use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A filtered, ordered select: equality filters plus at most one order column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<(String, Value)>,
    order: Option<(String, Direction)>,
}

impl Query {
    pub fn new() -> Self { Self::default() }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    /// Query-string pairs in the PostgREST dialect.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        for (col, v) in &self.filters {
            params.push((col.clone(), format!("eq.{}", literal(v))));
        }
        if let Some((col, dir)) = &self.order {
            let dir = match dir {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            params.push(("order".to_string(), format!("{}.{}", col, dir)));
        }
        params
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(col, v)| row.get(col) == Some(v))
    }

    /// Evaluate the query against rows held in memory.
    pub fn apply(&self, rows: &[Value]) -> Vec<Value> {
        let mut out: Vec<Value> = rows.iter().filter(|r| self.matches(r)).cloned().collect();
        if let Some((col, dir)) = &self.order {
            out.sort_by(|a, b| {
                let ord = compare(a.get(col), b.get(col));
                match dir {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        out
    }
}

fn literal(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc))
}

// nulls sort last in ascending order, as in Postgres
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => match (timestamp(x), timestamp(y)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty),
            _ => x.cmp(y),
        },
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
