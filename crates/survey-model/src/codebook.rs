//! Code → label mappings for categorical survey variables.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Which codebook a recoded column draws its labels from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodebookDomain {
    /// Country identifiers (the partition column).
    Country,
    /// Most-important-problem categories (the analysis columns).
    Problem,
}

impl CodebookDomain {
    pub const ALL: [CodebookDomain; 2] = [CodebookDomain::Country, CodebookDomain::Problem];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Problem => "problem",
        }
    }
}

impl fmt::Display for CodebookDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a stored numeric cell into a codebook key.
///
/// Only finite, integral values inside the `i64` range are codes; anything
/// else has no label.
pub fn code_from_f64(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

/// A static mapping from integer response codes to labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    name: String,
    entries: BTreeMap<i64, String>,
}

impl Codebook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Build a codebook, rejecting repeated codes.
    pub fn from_entries<I, S>(name: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        let mut codebook = Self::new(name);
        for (code, label) in entries {
            codebook.insert(code, label)?;
        }
        Ok(codebook)
    }

    pub fn insert(&mut self, code: i64, label: impl Into<String>) -> Result<()> {
        if self.entries.contains_key(&code) {
            return Err(ModelError::DuplicateCode {
                codebook: self.name.clone(),
                code,
            });
        }
        self.entries.insert(code, label.into());
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label_for(&self, code: i64) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// Label for a numeric cell as stored in the data file.
    pub fn label_for_value(&self, value: f64) -> Option<&str> {
        code_from_f64(value).and_then(|code| self.label_for(code))
    }

    /// Smallest code carrying `label`.
    pub fn code_for(&self, label: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(_, candidate)| candidate.as_str() == label)
            .map(|(code, _)| *code)
    }

    /// Entries in ascending code order.
    pub fn entries(&self) -> impl Iterator<Item = (i64, &str)> {
        self.entries
            .iter()
            .map(|(code, label)| (*code, label.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Label → rank by ascending code, used to order tied counts.
    pub fn label_ranks(&self) -> HashMap<String, i64> {
        let mut ranks = HashMap::with_capacity(self.entries.len());
        for (code, label) in &self.entries {
            ranks.entry(label.clone()).or_insert(*code);
        }
        ranks
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The pair of codebooks used by one reporting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebooks {
    pub country: Codebook,
    pub problem: Codebook,
}

impl Codebooks {
    pub fn new(country: Codebook, problem: Codebook) -> Self {
        Self { country, problem }
    }

    pub fn get(&self, domain: CodebookDomain) -> &Codebook {
        match domain {
            CodebookDomain::Country => &self.country,
            CodebookDomain::Problem => &self.problem,
        }
    }

    pub fn label_for(&self, domain: CodebookDomain, code: i64) -> Option<&str> {
        self.get(domain).label_for(code)
    }
}
