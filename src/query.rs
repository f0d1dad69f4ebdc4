//! Query URL construction for the tax-income service
//!
//! The service takes a fixed set of filter parameters alongside the looked-up
//! name. `QueryParams` holds those defaults immutably; each lookup derives its
//! own copy with the name filled in.

use url::Url;

/// Base endpoint of the tax-income query service
pub const DEFAULT_ENDPOINT: &str = "https://verokone.hs.fi/rest/query";

/// Tax year requested from the service and read back from each record
pub const TAX_YEAR: &str = "2024";

/// Ordered query parameters sent with every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl Default for QueryParams {
    fn default() -> Self {
        let pairs = [
            ("county", ""),
            ("gender", ""),
            ("taxyear", TAX_YEAR),
            ("age", ""),
            ("orderby", "gross_income"),
            ("brand", "is"),
            ("offset", "0"),
            ("limit", "100"),
        ];

        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key, value.to_string()))
                .collect(),
        }
    }
}

impl QueryParams {
    /// Returns a copy with `key` set to `value`
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn with(&self, key: &'static str, value: &str) -> Self {
        let mut pairs = self.pairs.clone();
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => pairs.push((key, value.to_string())),
        }
        Self { pairs }
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the key/value pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Builds lookup URLs against a fixed endpoint
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: Url,
    defaults: QueryParams,
}

impl QueryBuilder {
    /// Creates a builder for the given endpoint with the default parameters
    pub fn new(endpoint: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            defaults: QueryParams::default(),
        })
    }

    /// Returns the endpoint URL without any query
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Builds the full query URL for a name
    ///
    /// The name is form-encoded as-is; empty names and special characters are
    /// passed through to the service.
    pub fn build(&self, name: &str) -> Url {
        let params = self.defaults.with("name", name);
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().clear().extend_pairs(params.iter());
        url
    }
}
