use serde_json::Value;

/// A single filter condition on a document body field.
///
/// Field names may be dotted paths (`"state.isPaid"`) addressing nested
/// object members.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches documents whose value at `field` equals `value`.
    Eq { field: String, value: Value },
    /// Matches documents whose array at `field` contains at least one of
    /// `values`.
    ArrayContainsAny { field: String, values: Vec<String> },
}

impl Filter {
    /// Returns true if the document body satisfies this filter.
    pub fn matches(&self, data: &Value) -> bool {
        match self {
            Filter::Eq { field, value } => field_value(data, field) == Some(value),
            Filter::ArrayContainsAny { field, values } => field_value(data, field)
                .and_then(Value::as_array)
                .is_some_and(|members| {
                    members
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|member| values.iter().any(|v| v == member))
                }),
        }
    }
}

/// Query parameters for selecting documents from a collection.
///
/// All filters must hold for a document to match (logical AND). Results are
/// returned in insertion order, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Filter conditions, all of which must match.
    pub filters: Vec<Filter>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl Query {
    /// Creates an empty query matching every document in a collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter on a (possibly dotted) field path.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a filter matching documents whose array field contains any of
    /// the given string values.
    pub fn where_array_contains_any(
        mut self,
        field: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        self.filters.push(Filter::ArrayContainsAny {
            field: field.into(),
            values,
        });
        self
    }

    /// Limits the number of returned documents.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if the document body satisfies every filter.
    pub fn matches(&self, data: &Value) -> bool {
        self.filters.iter().all(|filter| filter.matches(data))
    }
}

/// Resolves a (possibly dotted) field path against a JSON object.
///
/// Returns `None` if any segment is missing or traverses a non-object.
pub fn field_value<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
