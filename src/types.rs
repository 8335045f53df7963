use std::fmt;
use std::str::FromStr;
use serde::Serialize;
use crate::error::SearchError;
use crate::node::NodeRef;

/// One hit: the value, the delimiter-joined path to it, and its own key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match<'t> {
    pub value: NodeRef<'t>,
    pub path: String,
    pub key: String,
}

/// Which of the ordered key-search hits to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occurrence {
    #[default]
    First,
    Last,
    All,
}

impl FromStr for Occurrence {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Occurrence::First),
            "last" => Ok(Occurrence::Last),
            "all" => Ok(Occurrence::All),
            other => Err(SearchError::InvalidArgument(format!("Invalid occurrence type: {other}"))),
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Occurrence::First => "first",
            Occurrence::Last => "last",
            Occurrence::All => "all",
        })
    }
}

/// Result of `Search::find`: a single optional hit for first/last, every hit for all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Found<'t> {
    One(Option<Match<'t>>),
    All(Vec<Match<'t>>),
}

impl<'t> Found<'t> {
    /// Flatten into a list: zero or one element for `One`.
    pub fn into_vec(self) -> Vec<Match<'t>> {
        match self {
            Found::One(m) => m.into_iter().collect(),
            Found::All(all) => all,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Found::One(m) => m.is_none(),
            Found::All(all) => all.is_empty(),
        }
    }
}
