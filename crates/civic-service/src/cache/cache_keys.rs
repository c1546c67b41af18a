//! Cache key and pattern construction.
//!
//! A key is `{namespace}:{operation}` followed by the JSON rendering of the
//! call's arguments: `:[..]` for positional arguments (tuples, scalars) and
//! `:{..}` for keyword arguments (structs, in field declaration order).

use civic_core::{CivicError, CivicResult, PageRequest, ServiceRequestId};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Namespace for every service request read.
pub const SERVICE_REQUEST_NAMESPACE: &str = "service_request";

/// Operation name of the point lookup.
pub const GET_SERVICE_REQUEST: &str = "get_service_request";

/// Operation name of the paginated listing.
pub const LIST_SERVICE_REQUESTS: &str = "list_service_requests";

/// Builder for a single cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    key: String,
}

impl CacheKey {
    /// Starts a key with no arguments.
    #[must_use]
    pub fn new(namespace: &str, operation: &str) -> Self {
        Self {
            key: format!("{}:{}", namespace, operation),
        }
    }

    /// Derives the key for one call, classifying `args` by its JSON shape.
    ///
    /// Arrays render as positional arguments, objects as keyword arguments,
    /// and any other value (including `null`) as a single positional
    /// argument. Only a zero-sized `A` such as `()` adds nothing, so two
    /// distinct values of `A` never share a key.
    pub fn for_args<A: Serialize>(namespace: &str, operation: &str, args: &A) -> CivicResult<Self> {
        let mut key = Self::new(namespace, operation);
        if std::mem::size_of::<A>() == 0 {
            return Ok(key);
        }

        let rendered = serde_json::to_string(args)?;
        match serde_json::to_value(args)? {
            Value::Array(_) | Value::Object(_) => key.push(&rendered),
            _ => key.push(&format!("[{}]", rendered)),
        }
        Ok(key)
    }

    /// Appends positional arguments, e.g. a tuple `(id,)` renders as `:[1]`.
    pub fn positional<A: Serialize + ?Sized>(mut self, args: &A) -> CivicResult<Self> {
        let rendered = serde_json::to_string(args)?;
        if serde_json::to_value(args)?.is_array() {
            self.push(&rendered);
        } else {
            self.push(&format!("[{}]", rendered));
        }
        Ok(self)
    }

    /// Appends keyword arguments; `args` must serialize to a JSON object.
    pub fn keyword<A: Serialize + ?Sized>(mut self, args: &A) -> CivicResult<Self> {
        if !serde_json::to_value(args)?.is_object() {
            return Err(CivicError::validation(
                "Keyword cache arguments must serialize to an object",
            ));
        }
        self.push(&serde_json::to_string(args)?);
        Ok(self)
    }

    /// The rendered key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Consumes the builder, returning the key.
    #[must_use]
    pub fn into_string(self) -> String {
        self.key
    }

    // Rendered from the value itself, not through `Value`, so struct fields
    // keep their declaration order.
    fn push(&mut self, rendered: &str) {
        self.key.push(':');
        self.key.push_str(rendered);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.key
    }
}

/// A set of keys to clear: an exact key, or every key starting with a
/// literal prefix (written `prefix*`).
///
/// `*` is only meaningful as the final character; other glob syntax is
/// matched literally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CachePattern {
    /// Every key beginning with the prefix.
    Prefix(String),
    /// One key.
    Exact(String),
}

impl CachePattern {
    /// Pattern matching every key.
    #[must_use]
    pub fn all() -> Self {
        Self::Prefix(String::new())
    }

    /// Pattern matching every key beginning with `prefix`.
    #[must_use]
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Pattern matching only `key`.
    #[must_use]
    pub fn exact(key: impl Into<String>) -> Self {
        Self::Exact(key.into())
    }

    /// Returns true if `key` is covered by this pattern.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Prefix(prefix) => key.starts_with(prefix.as_str()),
            Self::Exact(exact) => key == exact,
        }
    }

    /// Renders the pattern for `SCAN MATCH`, escaping glob metacharacters
    /// in the literal part.
    #[must_use]
    pub fn to_redis_glob(&self) -> String {
        let (literal, wildcard) = match self {
            Self::Prefix(prefix) => (prefix.as_str(), true),
            Self::Exact(key) => (key.as_str(), false),
        };

        let mut glob = String::with_capacity(literal.len() + 1);
        for c in literal.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                glob.push('\\');
            }
            glob.push(c);
        }
        if wildcard {
            glob.push('*');
        }
        glob
    }
}

impl FromStr for CachePattern {
    type Err = CivicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix('*') {
            Some(prefix) if !prefix.contains('*') => Ok(Self::Prefix(prefix.to_string())),
            None if !s.contains('*') => Ok(Self::Exact(s.to_string())),
            _ => Err(CivicError::validation(format!(
                "Unsupported cache pattern '{}': only a trailing '*' is allowed",
                s
            ))),
        }
    }
}

impl fmt::Display for CachePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(prefix) => write!(f, "{}*", prefix),
            Self::Exact(key) => f.write_str(key),
        }
    }
}

/// Key of the cached point lookup for `id`.
pub fn service_request_by_id(id: ServiceRequestId) -> CivicResult<String> {
    CacheKey::for_args(SERVICE_REQUEST_NAMESPACE, GET_SERVICE_REQUEST, &(id,)).map(String::from)
}

/// Key of one cached listing page.
pub fn service_request_list(page: PageRequest) -> CivicResult<String> {
    CacheKey::for_args(SERVICE_REQUEST_NAMESPACE, LIST_SERVICE_REQUESTS, &page).map(String::from)
}

/// Pattern covering every cached listing page.
#[must_use]
pub fn service_request_list_pattern() -> CachePattern {
    CachePattern::prefix(CacheKey::new(SERVICE_REQUEST_NAMESPACE, LIST_SERVICE_REQUESTS).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Filter<'a> {
        neighborhood: &'a str,
        limit: u32,
    }

    #[test]
    fn test_point_lookup_key() {
        let key = service_request_by_id(ServiceRequestId(7)).unwrap();
        assert_eq!(key, "service_request:get_service_request:[7]");
    }

    #[test]
    fn test_list_key_renders_keywords_in_field_order() {
        let key = service_request_list(PageRequest::new(0, 100)).unwrap();
        assert_eq!(
            key,
            r#"service_request:list_service_requests:{"skip":0,"limit":100}"#
        );
        assert!(service_request_list_pattern().matches(&key));
    }

    #[test]
    fn test_point_key_is_outside_list_pattern() {
        let key = service_request_by_id(ServiceRequestId(1)).unwrap();
        assert!(!service_request_list_pattern().matches(&key));
    }

    #[test]
    fn test_identical_args_identical_keys() {
        let a = CacheKey::for_args("ns", "op", &("abc", 1)).unwrap();
        let b = CacheKey::for_args("ns", "op", &("abc", 1)).unwrap();
        let c = CacheKey::for_args("ns", "op", &(1, "abc")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_scalar_and_unit_args() {
        assert_eq!(CacheKey::for_args("ns", "op", &"abc").unwrap().as_str(), r#"ns:op:["abc"]"#);
        assert_eq!(CacheKey::for_args("ns", "op", &()).unwrap().as_str(), "ns:op");
    }

    #[test]
    fn test_absent_and_empty_args_get_distinct_keys() {
        let none = CacheKey::for_args("ns", "search", &None::<Vec<String>>).unwrap();
        let empty = CacheKey::for_args("ns", "search", &Some(Vec::<String>::new())).unwrap();

        assert_eq!(none.as_str(), "ns:search:[null]");
        assert_eq!(empty.as_str(), "ns:search:[]");
        assert_ne!(none, empty);
    }

    #[test]
    fn test_empty_collections_stay_in_the_key() {
        #[derive(Serialize)]
        struct NoFilters {}

        assert_eq!(CacheKey::for_args("ns", "op", &Vec::<u8>::new()).unwrap().as_str(), "ns:op:[]");
        assert_eq!(CacheKey::for_args("ns", "op", &NoFilters {}).unwrap().as_str(), "ns:op:{}");
    }

    #[test]
    fn test_positional_then_keyword() {
        let key = CacheKey::new("ns", "search")
            .positional(&(3,))
            .unwrap()
            .keyword(&Filter {
                neighborhood: "Centro",
                limit: 10,
            })
            .unwrap();

        assert_eq!(key.as_str(), r#"ns:search:[3]:{"neighborhood":"Centro","limit":10}"#);
        assert!(CacheKey::new("ns", "search").keyword(&(1, 2)).is_err());
    }

    #[test]
    fn test_pattern_parsing() {
        assert_eq!("ns:*".parse::<CachePattern>().unwrap(), CachePattern::prefix("ns:"));
        assert_eq!("*".parse::<CachePattern>().unwrap(), CachePattern::all());
        assert_eq!("ns:a".parse::<CachePattern>().unwrap(), CachePattern::exact("ns:a"));
        assert!("ns:*:list".parse::<CachePattern>().is_err());
        assert!("**".parse::<CachePattern>().is_err());
    }

    #[test]
    fn test_pattern_display_round_trips() {
        for text in ["ns:*", "*", "ns:a"] {
            assert_eq!(text.parse::<CachePattern>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_redis_glob_escapes_metacharacters() {
        let pattern = CachePattern::prefix(r#"ns:op:{"q":"a?[b]"}"#);
        assert_eq!(pattern.to_redis_glob(), r#"ns:op:{"q":"a\?\[b\]"}*"#);
        assert_eq!(CachePattern::all().to_redis_glob(), "*");
        assert_eq!(CachePattern::exact("a*b").to_redis_glob(), r"a\*b");
    }

    #[test]
    fn test_exact_pattern_matches_only_itself() {
        let pattern = CachePattern::exact("ns:a");
        assert!(pattern.matches("ns:a"));
        assert!(!pattern.matches("ns:ab"));
    }
}
