//! Core types for symbol resolution.
//!
//! `SymbolName` is the typed form of a fully qualified unit name. All filesystem
//! paths the loader probes are derived from it, never from ad-hoc string
//! manipulation.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Canonical segment separator
pub const SEPARATOR: char = '.';

/// Alternate separator accepted on input (`Spaark\Core\Output`)
pub const ALT_SEPARATOR: char = '\\';

fn is_separator(c: char) -> bool {
    c == SEPARATOR || c == ALT_SEPARATOR
}

pub(crate) fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Fully qualified, segment-separated name of a loadable unit.
///
/// Leading and trailing separators are stripped on parse, so `\Spaark\Core` and
/// `Spaark.Core.` both denote `Spaark.Core`. Segment spelling is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolName {
    segments: Vec<String>,
}

impl SymbolName {
    /// Parse a raw name, accepting both `.` and `\` as separators.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let trimmed = raw.trim().trim_matches(is_separator);
        if trimmed.is_empty() {
            return Err(LoadError::InvalidName(raw.to_string()));
        }

        let segments: Vec<String> = trimmed.split(is_separator).map(str::to_string).collect();
        if segments.iter().any(|s| !is_identifier(s)) {
            return Err(LoadError::InvalidName(raw.to_string()));
        }

        Ok(Self { segments })
    }

    /// Build a name from segments known to be valid identifiers
    pub(crate) fn from_segments(segments: &[&str]) -> Self {
        debug_assert!(!segments.is_empty() && segments.iter().all(|s| is_identifier(s)));
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first_segment(&self) -> &str {
        &self.segments[0]
    }

    /// Lowercased first segment, the key used for registry lookups
    pub fn registry_key(&self) -> String {
        self.first_segment().to_lowercase()
    }

    pub fn trailing_segment(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Name with the last segment dropped, or `None` for a single-segment name
    pub fn parent(&self) -> Option<SymbolName> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append another name's segments to this one
    pub fn join(&self, other: &SymbolName) -> SymbolName {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Parse `raw` and append it to this name
    pub fn child(&self, raw: &str) -> Result<SymbolName, LoadError> {
        Ok(self.join(&SymbolName::parse(raw)?))
    }

    /// Case-insensitive identity used by the symbol table
    pub fn lookup_key(&self) -> String {
        self.to_string().to_lowercase()
    }

    /// Lowercased segments from `skip` onwards, joined with the platform separator.
    pub fn relative_path(&self, skip: usize) -> PathBuf {
        self.segments
            .iter()
            .skip(skip)
            .map(|s| s.to_lowercase())
            .collect()
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for SymbolName {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SymbolName::parse(s)
    }
}

impl TryFrom<String> for SymbolName {
    type Error = LoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SymbolName::parse(&value)
    }
}

impl From<SymbolName> for String {
    fn from(name: SymbolName) -> Self {
        name.to_string()
    }
}

/// Path of the unit file for `relative` under `root`: `root/relative<suffix>`.
pub fn unit_file_path(root: &Path, relative: &Path, suffix: &str) -> PathBuf {
    append_suffix(root.join(relative), suffix)
}

/// Directory component of `path` reinterpreted as a unit file: `dirname(path)<suffix>`.
pub fn parent_unit_file_path(path: &Path, suffix: &str) -> Option<PathBuf> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| append_suffix(p.to_path_buf(), suffix))
}

fn append_suffix(path: PathBuf, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.into_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}
