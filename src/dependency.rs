// src/dependency.rs

//! Dependency descriptors and Provides sets
//!
//! A [`Dependency`] is a (name, version range, color) tuple. Packages
//! declare what they supply as a [`DependencySet`] of Provides and ask for
//! what they need as individual Requires, and [`Dependency::overlaps`]
//! decides whether a Provide satisfies a Require.

use crate::error::{Error, Result};
use crate::evr::Evr;
use bitflags::bitflags;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

bitflags! {
    /// Comparison sense of a versioned dependency
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sense: u32 {
        const LESS = 1 << 1;
        const GREATER = 1 << 2;
        const EQUAL = 1 << 3;

        const LE = Self::LESS.bits() | Self::EQUAL.bits();
        const GE = Self::GREATER.bits() | Self::EQUAL.bits();
        const NE = Self::LESS.bits() | Self::GREATER.bits();
    }
}

impl Sense {
    /// Parse a comparison operator such as `>=` or `!=`
    pub fn from_operator(op: &str) -> Option<Self> {
        let sense = match op {
            "<" => Sense::LESS,
            "<=" | "=<" => Sense::LE,
            "=" | "==" => Sense::EQUAL,
            ">=" | "=>" => Sense::GE,
            ">" => Sense::GREATER,
            "!=" => Sense::NE,
            _ => return None,
        };
        Some(sense)
    }

    /// Operator text, empty for an unversioned dependency
    pub fn as_operator(&self) -> &'static str {
        match (
            self.contains(Sense::LESS),
            self.contains(Sense::GREATER),
            self.contains(Sense::EQUAL),
        ) {
            (true, false, false) => "<",
            (true, false, true) => "<=",
            (false, false, true) => "=",
            (false, true, true) => ">=",
            (false, true, false) => ">",
            (true, true, false) => "!=",
            _ => "",
        }
    }
}

/// A named, optionally versioned and colored capability
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Capability name, shared with any index entries built from it
    pub name: Arc<str>,
    pub evr: Option<Evr>,
    pub sense: Sense,
    /// Architecture color bits; 0 matches any color
    pub color: u32,
}

impl Dependency {
    /// An unversioned, uncolored dependency
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            evr: None,
            sense: Sense::empty(),
            color: 0,
        }
    }

    /// A dependency constrained by `sense` against `evr`
    pub fn versioned(name: impl Into<Arc<str>>, sense: Sense, evr: Evr) -> Self {
        Self {
            name: name.into(),
            evr: Some(evr),
            sense,
            color: 0,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Is this a file path dependency?
    pub fn is_file(&self) -> bool {
        self.name.starts_with('/')
    }

    /// Do the version ranges of two same-named dependencies intersect?
    ///
    /// An unversioned side (no sense bits, or no/empty EVR) overlaps
    /// everything with the same name.
    pub fn overlaps(&self, other: &Dependency) -> bool {
        if self.name != other.name {
            return false;
        }

        if self.sense.is_empty() || other.sense.is_empty() {
            return true;
        }

        let (mine, theirs) = match (&self.evr, &other.evr) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => (a, b),
            _ => return true,
        };

        let a = self.sense;
        let b = other.sense;
        match mine.compare(theirs) {
            Ordering::Less => a.contains(Sense::GREATER) || b.contains(Sense::LESS),
            Ordering::Greater => a.contains(Sense::LESS) || b.contains(Sense::GREATER),
            Ordering::Equal => {
                (a.contains(Sense::EQUAL) && b.contains(Sense::EQUAL))
                    || (a.contains(Sense::LESS) && b.contains(Sense::LESS))
                    || (a.contains(Sense::GREATER) && b.contains(Sense::GREATER))
            }
        }
    }
}

impl FromStr for Dependency {
    type Err = Error;

    /// Parse `name`, or `name op evr` separated by whitespace
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();

        let name = parts
            .next()
            .ok_or_else(|| Error::InvalidDependency("empty dependency".to_string()))?;

        let Some(op) = parts.next() else {
            return Ok(Dependency::new(name));
        };

        let sense = Sense::from_operator(op).ok_or_else(|| {
            Error::InvalidDependency(format!("unknown operator '{}' in '{}'", op, s))
        })?;

        let evr = parts
            .next()
            .ok_or_else(|| Error::InvalidDependency(format!("missing version in '{}'", s)))?
            .parse::<Evr>()?;

        if parts.next().is_some() {
            return Err(Error::InvalidDependency(format!(
                "trailing text in '{}'",
                s
            )));
        }

        Ok(Dependency::versioned(name, sense, evr))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(evr) = &self.evr {
            let op = self.sense.as_operator();
            if !op.is_empty() {
                write!(f, " {} {}", op, evr)?;
            }
        }
        Ok(())
    }
}

/// An ordered set of capabilities declared by one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    deps: Vec<Dependency>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dep: Dependency) {
        self.deps.push(dep);
    }

    pub fn count(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    pub fn get(&self, ix: usize) -> Option<&Dependency> {
        self.deps.get(ix)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
        self.deps.iter()
    }

    /// Does any member carry this name?
    pub fn contains_name(&self, name: &str) -> bool {
        self.deps.iter().any(|d| &*d.name == name)
    }

    /// Cursor positioned before the first element
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor { set: self, ix: 0 }
    }
}

impl FromIterator<Dependency> for DependencySet {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        Self {
            deps: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.deps.iter()
    }
}

/// Seekable iterator over a [`DependencySet`]
pub struct Cursor<'a> {
    set: &'a DependencySet,
    ix: usize,
}

impl<'a> Cursor<'a> {
    /// Reposition so the next call to `next` yields element `ix`
    pub fn set_ix(&mut self, ix: usize) {
        self.ix = ix;
    }

    /// Index of the element the next call to `next` yields
    pub fn ix(&self) -> usize {
        self.ix
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = (usize, &'a Dependency);

    fn next(&mut self) -> Option<Self::Item> {
        let set = self.set;
        let dep = set.deps.get(self.ix)?;
        let ix = self.ix;
        self.ix += 1;
        Some((ix, dep))
    }
}
