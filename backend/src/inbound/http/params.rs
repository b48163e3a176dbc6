//! Query-string parameters shared by list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::SearchTerm;

/// Optional free-text filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring matched against the listing's text fields.
    pub search: Option<String>,
}

impl SearchParams {
    pub fn term(&self) -> SearchTerm {
        SearchTerm::new(self.search.as_deref())
    }
}
