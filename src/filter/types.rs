use serde_json::Value;

/// Predicate over a stored document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocFilter {
    /// Matches every document.
    All,
    /// Field equals the given JSON value exactly.
    Eq { field: String, value: Value },
    /// Field is a string containing `needle`, ignoring case.
    /// An empty needle matches every document.
    Contains { field: String, needle: String },
    Or(Vec<DocFilter>),
    And(Vec<DocFilter>),
}

impl DocFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        DocFilter::Eq { field: field.into(), value: value.into() }
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        DocFilter::Contains { field: field.into(), needle: needle.into() }
    }

    pub fn or(filters: Vec<DocFilter>) -> Self {
        DocFilter::Or(filters)
    }

    pub fn and(filters: Vec<DocFilter>) -> Self {
        DocFilter::And(filters)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// A find request: optional predicate, single-field sort, and limit.
/// Results without a sort come back in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Option<DocFilter>,
    pub sort: Option<SortSpec>,
    pub limit: Option<i64>,
}

impl FindQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: DocFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(SortSpec { field: field.into(), direction: SortDirection::Desc });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Positional SQL parameter produced while compiling a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Json(Value),
    Int(i64),
}
