use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::cache::CachedMatch;
use crate::config::{SearchConfig, SearchOptions};
use crate::cycle::detect_circular;
use crate::error::{Result, SearchError};
use crate::node::NodeRef;
use crate::path::{resolve, validate_path};
use crate::state::SearchState;
use crate::stats::Statistics;
use crate::tree::Tree;
use crate::types::{Found, Match, Occurrence};
use crate::walk::{visit_all, walk};

/// Read-only search over one JSON-shaped tree.
///
/// Built once from a root container; every query borrows the instance immutably. Key
/// searches are cached per raw key, and every query feeds the [`Statistics`].
///
/// ```
/// use json_probe::{Search, SearchOptions};
/// use serde_json::json;
///
/// let doc = json!({"user": {"email": "a@x.com", "profile": {"email": "b@x.com"}}});
/// let search = Search::from_json(doc, SearchOptions::new()).unwrap();
///
/// let first = search.find_first("email").unwrap().unwrap();
/// assert_eq!(first.path, "user.email");
/// assert_eq!(search.find_all("email").unwrap().len(), 2);
/// ```
#[derive(Debug)]
pub struct Search {
    tree: Tree,
    config: SearchConfig,
    state: Mutex<SearchState>,
}

impl Search {
    /// Fails if the root is not an object or array, if an option is invalid, or if the
    /// tree contains a reference cycle, in that order.
    pub fn new(tree: Tree, options: SearchOptions) -> Result<Self> {
        if !tree.node(tree.root()).is_container() {
            return Err(SearchError::Type("Data must be a non-null object or array".into()));
        }
        let config = options.resolve()?;
        detect_circular(&tree, &config.path_delimiter)?;

        debug!(
            nodes = tree.len(),
            case_sensitive = config.case_sensitive,
            max_depth = %config.max_depth,
            delimiter = %config.path_delimiter,
            caching = config.caching,
            "search instance ready"
        );

        let state = SearchState::new(config.caching);
        Ok(Self { tree, config, state })
    }

    pub fn from_json(value: Value, options: SearchOptions) -> Result<Self> {
        Self::new(Tree::from(value), options)
    }

    /// The resolved configuration, with the current caching flag.
    pub fn config(&self) -> SearchConfig {
        SearchConfig { caching: self.is_caching(), ..self.config.clone() }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(&self.tree, self.tree.root())
    }

    /// Find entries whose key equals `key`, under the case-sensitivity setting.
    ///
    /// Misses are reported as `Found::One(None)` or an empty `Found::All`, never as errors.
    pub fn find(&self, key: &str, occurrence: Occurrence) -> Result<Found<'_>> {
        validate_key(key)?;
        let start = Instant::now();
        let hits = self.key_hits(key);
        self.record_search(start);

        Ok(match occurrence {
            Occurrence::First => Found::One(hits.first().map(|hit| self.to_match(hit))),
            Occurrence::Last => Found::One(hits.last().map(|hit| self.to_match(hit))),
            Occurrence::All => Found::All(hits.iter().map(|hit| self.to_match(hit)).collect()),
        })
    }

    /// [`Search::find`] with the occurrence given by name: `"first"`, `"last"` or `"all"`.
    pub fn find_with_mode(&self, key: &str, mode: &str) -> Result<Found<'_>> {
        let occurrence: Occurrence = mode.parse()?;
        self.find(key, occurrence)
    }

    pub fn find_first(&self, key: &str) -> Result<Option<Match<'_>>> {
        Ok(self.find(key, Occurrence::First)?.into_vec().pop())
    }

    pub fn find_last(&self, key: &str) -> Result<Option<Match<'_>>> {
        Ok(self.find(key, Occurrence::Last)?.into_vec().pop())
    }

    pub fn find_all(&self, key: &str) -> Result<Vec<Match<'_>>> {
        Ok(self.find(key, Occurrence::All)?.into_vec())
    }

    /// Resolve a delimiter-joined path. Never reads or fills the key cache.
    pub fn find_by_path(&self, path: &str) -> Result<Option<Match<'_>>> {
        let delimiter = self.config.path_delimiter.as_str();
        validate_path(path, delimiter)?;
        let start = Instant::now();

        let found = resolve(&self.tree, path, delimiter).map(|value| Match {
            value,
            path: path.to_string(),
            key: path.rsplit(delimiter).next().unwrap_or(path).to_string(),
        });

        self.record_search(start);
        Ok(found)
    }

    /// Every entry for which `predicate(value, key, path_segments)` holds, in traversal order.
    pub fn find_where<P>(&self, mut predicate: P) -> Vec<Match<'_>>
    where
        P: FnMut(NodeRef<'_>, &str, &[String]) -> bool,
    {
        match self.try_find_where(|value, key, path| Ok::<_, Infallible>(predicate(value, key, path))) {
            Ok(found) => found,
            Err(never) => match never {},
        }
    }

    /// Like [`Search::find_where`] for a predicate that can fail. The first error stops the
    /// walk and is returned as-is; the call still counts as a search.
    pub fn try_find_where<E, P>(&self, mut predicate: P) -> std::result::Result<Vec<Match<'_>>, E>
    where
        P: FnMut(NodeRef<'_>, &str, &[String]) -> std::result::Result<bool, E>,
    {
        let start = Instant::now();
        let delimiter = self.config.path_delimiter.as_str();
        let mut found = Vec::new();

        let outcome = walk(&self.tree, self.config.max_depth, |value, key, path| {
            if predicate(value, key, path)? {
                found.push(Match { value, path: path.join(delimiter), key: key.to_string() });
            }
            Ok(())
        });

        self.record_search(start);
        outcome.map(|()| found)
    }

    /// Entries whose key matches `pattern`. Case handling is up to the pattern (`(?i)`).
    pub fn find_keys_matching(&self, pattern: &Regex) -> Vec<Match<'_>> {
        self.find_where(|_, key, _| pattern.is_match(key))
    }

    pub fn statistics(&self) -> Statistics {
        self.state.lock().stats.snapshot()
    }

    pub fn clear_cache(&self) {
        let mut state = self.state.lock();
        trace!(entries = state.cache.len(), "clearing result cache");
        state.cache.clear();
    }

    /// Turn result caching on or off. Turning it off discards every cached entry.
    pub fn set_caching(&self, enabled: bool) {
        self.state.lock().cache.set_enabled(enabled);
        debug!(enabled, "result caching toggled");
    }

    pub fn is_caching(&self) -> bool {
        self.state.lock().cache.is_enabled()
    }

    fn key_hits(&self, key: &str) -> Arc<[CachedMatch]> {
        {
            let mut state = self.state.lock();
            if state.cache.is_enabled() {
                if let Some(hits) = state.cache.get(key) {
                    state.stats.record_hit();
                    trace!(key, hits = hits.len(), "cache hit");
                    return hits;
                }
                state.stats.record_miss();
                trace!(key, "cache miss");
            }
        }

        let hits: Arc<[CachedMatch]> = self.collect_key(key).into();
        self.state.lock().cache.insert(key, Arc::clone(&hits));
        hits
    }

    fn collect_key(&self, key: &str) -> Vec<CachedMatch> {
        let case_sensitive = self.config.case_sensitive;
        let needle: Cow<'_, str> = if case_sensitive { Cow::Borrowed(key) } else { Cow::Owned(key.to_lowercase()) };
        let delimiter = self.config.path_delimiter.as_str();
        let mut hits = Vec::new();

        visit_all(&self.tree, self.config.max_depth, |value, current, path| {
            let matched = if case_sensitive {
                current == needle
            } else {
                current.to_lowercase() == needle
            };
            if matched {
                hits.push(CachedMatch {
                    node: value.id(),
                    path: path.join(delimiter),
                    key: current.to_string(),
                });
            }
        });
        hits
    }

    fn to_match(&self, hit: &CachedMatch) -> Match<'_> {
        Match {
            value: NodeRef::new(&self.tree, hit.node),
            path: hit.path.clone(),
            key: hit.key.clone(),
        }
    }

    fn record_search(&self, start: Instant) {
        let elapsed = start.elapsed();
        self.state.lock().stats.record_search(elapsed);
        trace!(?elapsed, "search finished");
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(SearchError::key(key, "Key cannot be empty"));
    }
    Ok(())
}
