//! Search engine for in-memory, JSON-shaped trees.
//!
//! A [`Search`] is built once from a root object or array and answers three kinds of
//! query, each reporting hits as a [`Match`] of value, path and key:
//!
//! - [`Search::find`]: every entry with a given key, depth-first, with first/last/all selection
//! - [`Search::find_by_path`]: the single value at a delimiter-joined path
//! - [`Search::find_where`]: every entry accepted by a caller predicate
//!
//! Trees can come straight from `serde_json::Value`, or be assembled with [`TreeBuilder`]
//! when subtrees are shared. Trees containing a reference cycle are rejected when the
//! search is built.

mod cache;
mod config;
mod cycle;
mod error;
mod file;
mod node;
mod path;
mod search;
mod state;
mod stats;
mod tree;
mod types;
mod walk;

pub use config::{load_options, MaxDepth, SearchConfig, SearchOptions};
pub use error::{Result, SearchError};
pub use file::{read_json, read_json_file, read_json_input, LoadError};
pub use node::{truncate, NodeRef};
pub use path::RESERVED_SEGMENTS;
pub use search::Search;
pub use stats::Statistics;
pub use tree::{NodeId, Tree, TreeBuilder};
pub use types::{Found, Match, Occurrence};
