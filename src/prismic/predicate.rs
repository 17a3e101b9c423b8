//! Query predicates and options

use std::fmt;

/// A single search predicate, e.g. `[at(document.type, "posts")]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    name: &'static str,
    path: String,
    value: String,
}

impl Predicate {
    /// Exact match on a field
    pub fn at(path: &str, value: &str) -> Self {
        Self {
            name: "at",
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    /// Documents of a given custom type
    pub fn document_type(document_type: &str) -> Self {
        Self::at("document.type", document_type)
    }

    /// Document of a given type with a given uid
    pub fn uid(document_type: &str, uid: &str) -> Self {
        Self::at(&format!("my.{}.uid", document_type), uid)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped = self.value.replace('\\', "\\\\").replace('"', "\\\"");
        write!(f, "[{}({}, \"{}\")]", self.name, self.path, escaped)
    }
}

/// Build the `q` parameter for a set of predicates
pub fn to_query(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(|p| p.to_string()).collect();
    format!("[{}]", inner)
}

/// Options accepted by a search query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub page_size: Option<u32>,
    /// Raw orderings, e.g. `[document.first_publication_date desc]`
    pub orderings: Option<String>,
}

impl QueryOptions {
    pub fn page_size(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Sort by `orderings` instead of the API's default order
    pub fn ordered_by(mut self, orderings: Option<&str>) -> Self {
        self.orderings = orderings.map(str::to_string);
        self
    }

    /// Query-string pairs for these options
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page_size) = self.page_size {
            params.push(("pageSize", page_size.to_string()));
        }
        if let Some(orderings) = &self.orderings {
            params.push(("orderings", orderings.clone()));
        }
        params
    }
}
