/// Case-insensitive AND match of search terms against product names.
#[derive(Debug, Clone, Default)]
pub struct SearchTerms {
    terms: Vec<String>, // Lower-cased
}

impl SearchTerms {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }

    /// An empty name never matches. With no terms every other name does.
    pub fn matches(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let name = name.to_lowercase();
        self.terms.iter().all(|term| name.contains(term.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
