// src/evr.rs

//! Epoch:Version-Release parsing and ordering
//!
//! Versions compare the way RPM compares them: alphanumeric segments are
//! matched pairwise, digit runs numerically and letter runs byte-wise,
//! with numeric segments always newer than alpha segments.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Compare two version (or release) strings segment by segment.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        while i < a.len() && !a[i].is_ascii_alphanumeric() {
            i += 1;
        }
        while j < b.len() && !b[j].is_ascii_alphanumeric() {
            j += 1;
        }
        if i >= a.len() || j >= b.len() {
            break;
        }

        let numeric = a[i].is_ascii_digit();
        let in_segment = |c: u8| {
            if numeric {
                c.is_ascii_digit()
            } else {
                c.is_ascii_alphabetic()
            }
        };
        let one_end = i + a[i..].iter().take_while(|&&c| in_segment(c)).count();
        let two_end = j + b[j..].iter().take_while(|&&c| in_segment(c)).count();

        // Segments of different type: numeric wins
        if j == two_end {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let mut one = &a[i..one_end];
        let mut two = &b[j..two_end];

        if numeric {
            one = strip_leading_zeros(one);
            two = strip_leading_zeros(two);
            match one.len().cmp(&two.len()) {
                Ordering::Equal => {}
                longer => return longer,
            }
        }

        match one.cmp(two) {
            Ordering::Equal => {}
            other => return other,
        }

        i = one_end;
        j = two_end;
    }

    match (i >= a.len(), j >= b.len()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        _ => Ordering::Greater,
    }
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&c| c == b'0').count();
    &digits[zeros..]
}

/// A parsed `[epoch:]version[-release]` triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Evr {
    /// Epoch; `None` disables epoch comparison
    pub epoch: Option<String>,
    pub version: String,
    /// Release; `None` disables release comparison
    pub release: Option<String>,
}

impl Evr {
    /// Build an EVR from its parts
    pub fn new(epoch: Option<u32>, version: impl Into<String>, release: Option<String>) -> Self {
        Self {
            epoch: epoch.map(|e| e.to_string()),
            version: version.into(),
            release,
        }
    }

    /// Split an EVR string into epoch, version and release.
    ///
    /// Leading digits terminated by `:` are the epoch (an empty epoch means
    /// `0`), and the release follows the last `-`.
    pub fn parse(evr: &str) -> Self {
        let digits = evr.bytes().take_while(u8::is_ascii_digit).count();

        let (epoch, rest) = if evr[digits..].starts_with(':') {
            let epoch = if digits == 0 { "0" } else { &evr[..digits] };
            (Some(epoch.to_string()), &evr[digits + 1..])
        } else {
            (None, evr)
        };

        let (version, release) = match rest.rfind('-') {
            Some(pos) => (&rest[..pos], Some(rest[pos + 1..].to_string())),
            None => (rest, None),
        };

        Self {
            epoch,
            version: version.to_string(),
            release,
        }
    }

    /// Are epoch, version and release all absent or empty?
    pub fn is_empty(&self) -> bool {
        non_empty(self.epoch.as_deref()).is_none()
            && self.version.is_empty()
            && non_empty(self.release.as_deref()).is_none()
    }

    /// Compare two EVRs the way dependency ranges are evaluated.
    ///
    /// When only one side carries a non-zero epoch, that side is newer.
    /// Releases take part only when both sides have one.
    pub fn compare(&self, other: &Evr) -> Ordering {
        let mine = non_empty(self.epoch.as_deref());
        let theirs = non_empty(other.epoch.as_deref());

        let sense = match (mine, theirs) {
            (Some(a), Some(b)) => rpmvercmp(a, b),
            (Some(a), None) if is_nonzero(a) => Ordering::Greater,
            (None, Some(b)) if is_nonzero(b) => Ordering::Less,
            _ => Ordering::Equal,
        };
        if sense != Ordering::Equal {
            return sense;
        }

        let sense = rpmvercmp(&self.version, &other.version);
        if sense != Ordering::Equal {
            return sense;
        }

        match (
            non_empty(self.release.as_deref()),
            non_empty(other.release.as_deref()),
        ) {
            (Some(a), Some(b)) => rpmvercmp(a, b),
            _ => Ordering::Equal,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn is_nonzero(digits: &str) -> bool {
    digits.bytes().any(|c| c != b'0')
}

impl FromStr for Evr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidEvr("empty version string".to_string()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(Error::InvalidEvr(format!("whitespace in '{}'", s)));
        }
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = &self.epoch {
            write!(f, "{}:", epoch)?;
        }
        write!(f, "{}", self.version)?;
        if let Some(release) = &self.release {
            write!(f, "-{}", release)?;
        }
        Ok(())
    }
}
