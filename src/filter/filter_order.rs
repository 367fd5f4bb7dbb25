use std::cmp::Ordering;

use serde_json::Value;

use super::types::{SortDirection, SortSpec, SqlParam};
use crate::database::Document;

impl SortSpec {
    /// ORDER BY fragment; documents lacking the field sort last, ties fall
    /// back to insertion order.
    pub fn to_sql(&self, param_index: usize) -> (String, SqlParam) {
        (
            format!(
                "ORDER BY doc -> ${} {} NULLS LAST, seq ASC",
                param_index,
                self.direction.to_sql()
            ),
            SqlParam::Text(self.field.clone()),
        )
    }

    /// In-memory counterpart of [`SortSpec::to_sql`]. Stable sorts keep
    /// insertion order for ties.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        match (a.get(&self.field), b.get(&self.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y);
                match self.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        }
    }
}

// jsonb ordering: null < string < number < boolean < array < object
fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn descending_numbers_with_missing_last() {
        let spec = SortSpec { field: "upvote".into(), direction: SortDirection::Desc };
        let mut docs = vec![
            doc(json!({"n": 1, "upvote": 3})),
            doc(json!({"n": 2})),
            doc(json!({"n": 3, "upvote": 10})),
            doc(json!({"n": 4, "upvote": 3})),
        ];
        docs.sort_by(|a, b| spec.compare(a, b));
        let order: Vec<i64> = docs.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![3, 1, 4, 2]);
    }

    #[test]
    fn ascending_still_puts_missing_last() {
        let spec = SortSpec { field: "book_title".into(), direction: SortDirection::Asc };
        let mut docs = vec![
            doc(json!({"n": 1, "book_title": "Emma"})),
            doc(json!({"n": 2})),
            doc(json!({"n": 3, "book_title": "Dune"})),
        ];
        docs.sort_by(|a, b| spec.compare(a, b));
        let order: Vec<i64> = docs.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(spec.to_sql(1).0, "ORDER BY doc -> $1 ASC NULLS LAST, seq ASC");
    }

    #[test]
    fn sql_fragment_binds_field() {
        let spec = SortSpec { field: "upvote".into(), direction: SortDirection::Desc };
        let (sql, param) = spec.to_sql(3);
        assert_eq!(sql, "ORDER BY doc -> $3 DESC NULLS LAST, seq ASC");
        assert_eq!(param, SqlParam::Text("upvote".into()));
    }
}
