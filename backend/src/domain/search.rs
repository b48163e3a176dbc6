//! Free-text list filtering.

/// Case-insensitive substring filter; blank input matches everything.
///
/// # Examples
/// ```
/// use motofinance::domain::SearchTerm;
///
/// let term = SearchTerm::new(Some(" oTiEno "));
/// assert!(term.matches_any([Some("Otieno Ouma"), None]));
/// assert!(!term.matches_any([Some("Kamau")]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(Option<String>);

impl SearchTerm {
    /// Normalise raw query input.
    pub fn new(raw: Option<&str>) -> Self {
        Self(
            raw.map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_lowercase),
        )
    }

    /// Whether any of the candidate fields contains the term.
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        let Some(needle) = &self.0 else {
            return true;
        };
        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle.as_str()))
    }

    /// Keep the items whose fields match.
    pub fn filter<T, F>(&self, items: Vec<T>, fields: F) -> Vec<T>
    where
        F: Fn(&T) -> Vec<Option<&str>>,
    {
        if self.0.is_none() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| self.matches_any(fields(item)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_terms_match_everything(#[case] raw: Option<&str>) {
        assert!(SearchTerm::new(raw).matches_any([None]));
    }

    #[rstest]
    fn filter_keeps_matching_items() {
        let names = vec!["Wanjiku", "Kiprono", "Wambui"];
        let kept = SearchTerm::new(Some("wa")).filter(names, |name| vec![Some(*name)]);
        assert_eq!(kept, vec!["Wanjiku", "Wambui"]);
    }
}
