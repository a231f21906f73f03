use std::fmt;
use std::str::FromStr;

use crate::BuildError;

/// Output languages the instruction builder knows how to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Go,
}

impl Language {
    /// Names accepted on the command line, in the order they are offered.
    pub const NAMES: &'static [&'static str] = &["go"];

    pub fn all() -> &'static [Language] {
        &[Language::Go]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Go => "go",
        }
    }

    /// `find -name` pattern matching the files protoc emits for this language.
    pub fn generated_pattern(&self) -> &'static str {
        match self {
            Language::Go => "*.pb.go",
        }
    }

    /// Path segment marking vendored trees whose protos must not be recompiled.
    pub fn vendored_segment(&self) -> Option<&'static str> {
        match self {
            Language::Go => Some("vendor"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.name() == s)
            .ok_or_else(|| BuildError::UnsupportedLanguage(s.to_string()))
    }
}
