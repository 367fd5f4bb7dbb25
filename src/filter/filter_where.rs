use super::types::{DocFilter, SqlParam};

/// Compiles a [`DocFilter`] into a parameterised WHERE fragment over the
/// `doc` JSONB column. Field names are always bound, never interpolated.
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(filter: &DocFilter, starting_param_index: usize) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new(starting_param_index);
        let clause = filter_where.build(filter);
        (clause, filter_where.param_values)
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    fn build(&mut self, filter: &DocFilter) -> String {
        match filter {
            DocFilter::All => "TRUE".to_string(),
            DocFilter::Eq { field, value } => {
                let f = self.param(SqlParam::Text(field.clone()));
                let v = self.param(SqlParam::Json(value.clone()));
                format!("doc -> {} = {}", f, v)
            }
            DocFilter::Contains { needle, .. } if needle.is_empty() => "TRUE".to_string(),
            DocFilter::Contains { field, needle } => {
                let f = self.param(SqlParam::Text(field.clone()));
                let n = self.param(SqlParam::Text(needle.clone()));
                format!(
                    "(jsonb_typeof(doc -> {f}) = 'string' AND strpos(lower(doc ->> {f}), lower({n})) > 0)"
                )
            }
            DocFilter::Or(filters) => self.join(filters, " OR ", "FALSE"),
            DocFilter::And(filters) => self.join(filters, " AND ", "TRUE"),
        }
    }

    fn join(&mut self, filters: &[DocFilter], sep: &str, empty: &str) -> String {
        if filters.is_empty() {
            return empty.to_string();
        }
        let parts: Vec<String> = filters.iter().map(|f| self.build(f)).collect();
        format!("({})", parts.join(sep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equality_binds_field_and_value() {
        let (sql, params) = FilterWhere::generate(&DocFilter::eq("book_id", "abc"), 0);
        assert_eq!(sql, "doc -> $1 = $2");
        assert_eq!(
            params,
            vec![SqlParam::Text("book_id".into()), SqlParam::Json(json!("abc"))]
        );
    }

    #[test]
    fn or_of_contains_numbers_params_in_order() {
        let filter = DocFilter::or(vec![
            DocFilter::contains("book_title", "dune"),
            DocFilter::contains("book_author", "dune"),
        ]);
        let (sql, params) = FilterWhere::generate(&filter, 0);
        assert!(sql.starts_with('('));
        assert!(sql.contains(" OR "));
        assert!(sql.contains("doc -> $1"));
        assert!(sql.contains("lower($2)"));
        assert!(sql.contains("doc -> $3"));
        assert!(sql.contains("lower($4)"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn starting_index_offsets_placeholders() {
        let (sql, _) = FilterWhere::generate(&DocFilter::eq("email", "a@x.com"), 2);
        assert_eq!(sql, "doc -> $3 = $4");
    }

    #[test]
    fn empty_groups_and_needles() {
        assert_eq!(FilterWhere::generate(&DocFilter::or(vec![]), 0).0, "FALSE");
        assert_eq!(FilterWhere::generate(&DocFilter::and(vec![]), 0).0, "TRUE");
        let (sql, params) = FilterWhere::generate(&DocFilter::contains("book_title", ""), 0);
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }
}
