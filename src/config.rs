use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{Result, SearchError};
use crate::file::{read_json_file, LoadError};

/// How far below the root a traversal may go.
///
/// `Limited(n)` allows `n` edges from the root: `Limited(0)` visits nothing, `Limited(1)` only
/// the root's direct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxDepth {
    #[default]
    Unbounded,
    Limited(usize),
}

impl MaxDepth {
    /// True when an entry whose path has `depth` segments may not be descended into.
    pub fn reached(self, depth: usize) -> bool {
        match self {
            MaxDepth::Unbounded => false,
            MaxDepth::Limited(max) => depth >= max,
        }
    }
}

impl From<usize> for MaxDepth {
    fn from(depth: usize) -> Self {
        MaxDepth::Limited(depth)
    }
}

// Unbounded serializes as `null`, the same form `from_json` reads back.
impl Serialize for MaxDepth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            MaxDepth::Unbounded => serializer.serialize_none(),
            MaxDepth::Limited(n) => serializer.serialize_some(n),
        }
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxDepth::Unbounded => f.write_str("unbounded"),
            MaxDepth::Limited(n) => write!(f, "{n}"),
        }
    }
}

/// Partial option set; unset fields fall back to defaults in [`SearchOptions::resolve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub case_sensitive: Option<bool>,
    pub max_depth: Option<MaxDepth>,
    pub path_delimiter: Option<String>,
    pub caching: Option<bool>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(MaxDepth::Limited(max_depth));
        self
    }

    pub fn with_unbounded_depth(mut self) -> Self {
        self.max_depth = Some(MaxDepth::Unbounded);
        self
    }

    pub fn with_path_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.path_delimiter = Some(delimiter.into());
        self
    }

    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = Some(caching);
        self
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: SearchOptions) -> Self {
        Self {
            case_sensitive: other.case_sensitive.or(self.case_sensitive),
            max_depth: other.max_depth.or(self.max_depth),
            path_delimiter: other.path_delimiter.or(self.path_delimiter),
            caching: other.caching.or(self.caching),
        }
    }

    /// Read options from a loosely-typed JSON object using the camelCase field names.
    ///
    /// Fields with the wrong JSON type fail with [`SearchError::Config`]. `maxDepth` accepts a
    /// non-negative number (fractions round up), `null`, or `"unbounded"`/`"infinity"`.
    /// Unknown fields are ignored.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(SearchError::Config("options must be an object".into()));
        };

        let mut options = SearchOptions::default();

        if let Some(v) = map.get("caseSensitive") {
            let flag = v
                .as_bool()
                .ok_or_else(|| SearchError::Config("caseSensitive option must be a boolean".into()))?;
            options.case_sensitive = Some(flag);
        }

        if let Some(v) = map.get("maxDepth") {
            options.max_depth = Some(max_depth_from_json(v)?);
        }

        if let Some(v) = map.get("pathDelimiter") {
            let delimiter = v.as_str().ok_or_else(|| {
                SearchError::Config("pathDelimiter must be a non-empty string".into())
            })?;
            options.path_delimiter = Some(delimiter.to_string());
        }

        if let Some(v) = map.get("caching") {
            let flag = v
                .as_bool()
                .ok_or_else(|| SearchError::Config("caching option must be a boolean".into()))?;
            options.caching = Some(flag);
        }

        Ok(options)
    }

    /// Fill defaults and validate, producing the configuration a search instance runs with.
    pub fn resolve(self) -> Result<SearchConfig> {
        let path_delimiter = self.path_delimiter.unwrap_or_else(|| ".".to_string());
        if path_delimiter.is_empty() {
            return Err(SearchError::Config("pathDelimiter must be a non-empty string".into()));
        }

        Ok(SearchConfig {
            case_sensitive: self.case_sensitive.unwrap_or(true),
            max_depth: self.max_depth.unwrap_or_default(),
            path_delimiter,
            caching: self.caching.unwrap_or(true),
        })
    }
}

fn max_depth_from_json(value: &Value) -> Result<MaxDepth> {
    let invalid = || SearchError::Config("maxDepth must be a non-negative number".into());
    match value {
        Value::Null => Ok(MaxDepth::Unbounded),
        Value::String(s) if s.eq_ignore_ascii_case("unbounded") || s.eq_ignore_ascii_case("infinity") => {
            Ok(MaxDepth::Unbounded)
        }
        Value::Number(n) => {
            if let Some(depth) = n.as_u64() {
                return Ok(MaxDepth::Limited(usize::try_from(depth).unwrap_or(usize::MAX)));
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.is_finite() => Ok(MaxDepth::Limited(f.ceil() as usize)),
                _ => Err(invalid()),
            }
        }
        _ => Err(invalid()),
    }
}

/// Fully resolved options. Fixed for the life of a search instance; only the caching flag
/// can change afterwards, and that lives with the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub case_sensitive: bool,
    pub max_depth: MaxDepth,
    pub path_delimiter: String,
    pub caching: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            max_depth: MaxDepth::Unbounded,
            path_delimiter: ".".to_string(),
            caching: true,
        }
    }
}

/// Load an options object from a JSON file.
pub fn load_options(path: impl AsRef<Path>) -> std::result::Result<SearchOptions, LoadError> {
    let value = read_json_file(path)?;
    Ok(SearchOptions::from_json(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_options_resolve_to_defaults() {
        let config = SearchOptions::new().resolve().unwrap();
        assert_eq!(config, SearchConfig::default());
        assert!(config.case_sensitive);
        assert!(config.caching);
        assert_eq!(config.max_depth, MaxDepth::Unbounded);
        assert_eq!(config.path_delimiter, ".");
    }

    #[test]
    fn empty_delimiter_is_rejected() {
        let err = SearchOptions::new().with_path_delimiter("").resolve().unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn json_options_are_type_checked() {
        let cases = [
            (json!({"caseSensitive": "yes"}), "caseSensitive option must be a boolean"),
            (json!({"maxDepth": -1}), "maxDepth must be a non-negative number"),
            (json!({"maxDepth": "deep"}), "maxDepth must be a non-negative number"),
            (json!({"pathDelimiter": 5}), "pathDelimiter must be a non-empty string"),
            (json!({"caching": 1}), "caching option must be a boolean"),
        ];
        for (input, message) in cases {
            let err = SearchOptions::from_json(&input).unwrap_err();
            assert_eq!(err, SearchError::Config(message.into()), "input: {input}");
        }

        let err = SearchOptions::from_json(&json!({"pathDelimiter": ""}))
            .unwrap()
            .resolve()
            .unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn json_max_depth_forms() {
        let parse = |v: Value| SearchOptions::from_json(&json!({ "maxDepth": v })).unwrap().max_depth;
        assert_eq!(parse(json!(3)), Some(MaxDepth::Limited(3)));
        assert_eq!(parse(json!(2.5)), Some(MaxDepth::Limited(3)));
        assert_eq!(parse(json!(0)), Some(MaxDepth::Limited(0)));
        assert_eq!(parse(json!(null)), Some(MaxDepth::Unbounded));
        assert_eq!(parse(json!("Infinity")), Some(MaxDepth::Unbounded));
    }

    #[test]
    fn merge_prefers_later_fields() {
        let base = SearchOptions::new().with_caching(false).with_path_delimiter("/");
        let merged = base.merge(SearchOptions::new().with_path_delimiter("::"));
        assert_eq!(merged.caching, Some(false));
        assert_eq!(merged.path_delimiter.as_deref(), Some("::"));
    }

    #[test]
    fn depth_limit_applies_at_cutoff() {
        assert!(MaxDepth::Limited(0).reached(0));
        assert!(!MaxDepth::Limited(2).reached(1));
        assert!(MaxDepth::Limited(2).reached(2));
        assert!(!MaxDepth::Unbounded.reached(usize::MAX));
    }
}
