//! Swarm selection by name pattern
//!
//! A [`SwarmFilter`] includes a swarm when its name matches the primary
//! pattern at the start of the name (case-sensitive) and matches none of the
//! exclusion patterns anywhere in the name (case-insensitive).

use regex::{Regex, RegexBuilder};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::proc::Proc;
use crate::domain::swarm::Swarm;
use crate::dto::swarm::SwarmQuery;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Compiled include pattern plus accumulated exclusions
#[derive(Debug, Clone)]
pub struct SwarmFilter {
    pattern: String,
    include: Regex,
    exclusions: Vec<Regex>,
}

impl SwarmFilter {
    /// Compile a filter. The empty pattern selects every swarm.
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let include = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            FilterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            include,
            exclusions: Vec::new(),
        })
    }

    /// Filter that selects everything
    pub fn all() -> Self {
        Self {
            pattern: String::new(),
            include: Regex::new("^").expect("empty pattern is valid"),
            exclusions: Vec::new(),
        }
    }

    /// Add one exclusion pattern.
    pub fn exclude(&mut self, pattern: &str) -> Result<(), FilterError> {
        let exclusion = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| FilterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        self.exclusions.push(exclusion);
        Ok(())
    }

    /// Builder-style variant of [`SwarmFilter::exclude`]
    pub fn excluding<I, S>(mut self, patterns: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.exclude(pattern.as_ref())?;
        }
        Ok(self)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.include.is_match(name) && !self.exclusions.iter().any(|x| x.is_match(name))
    }

    /// Keep the matching swarms, in input order.
    pub fn matches(&self, swarms: Vec<Swarm>) -> Vec<Swarm> {
        swarms
            .into_iter()
            .filter(|swarm| self.is_match(&swarm.name()))
            .collect()
    }

    /// Query used to narrow the swarm list on the server
    pub fn query(&self) -> SwarmQuery {
        SwarmQuery::from_pattern(&self.pattern)
    }
}

impl Default for SwarmFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for SwarmFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SwarmFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

/// Restricts proc actions to a single host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcHostFilter {
    host: Option<String>,
}

impl ProcHostFilter {
    pub fn new(host: Option<String>) -> Self {
        Self {
            host: host.filter(|h| !h.is_empty()),
        }
    }

    pub fn is_match(&self, proc: &Proc) -> bool {
        self.host.as_deref().is_none_or(|host| proc.host == host)
    }

    pub fn matches<'a>(&'a self, procs: &'a [Proc]) -> impl Iterator<Item = &'a Proc> + 'a {
        procs.iter().filter(move |p| self.is_match(p))
    }
}
