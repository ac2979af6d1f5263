use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a string that is not one of the known tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tag: {0}")]
pub struct ParseTagError(pub String);

/// Category assigned to a note.
///
/// The tag vocabulary is a closed set: the notes service only accepts these
/// five values, so anything else is rejected before a request is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteTag {
    /// Default tag for new notes.
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    /// Every tag the service knows about, in display order.
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    /// Returns the canonical wire name for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Meeting => "Meeting",
            Self::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteTag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Todo" => Ok(Self::Todo),
            "Work" => Ok(Self::Work),
            "Personal" => Ok(Self::Personal),
            "Meeting" => Ok(Self::Meeting),
            "Shopping" => Ok(Self::Shopping),
            other => Err(ParseTagError(other.to_string())),
        }
    }
}

/// Tag filter applied to a note listing.
///
/// `All` means "no filter" and is never sent to the service; the `tag`
/// query parameter is omitted entirely in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TagFilter {
    #[default]
    All,
    Tag(NoteTag),
}

impl TagFilter {
    /// Derives the initial filter from a path-like segment.
    ///
    /// Accepted values are the fixed tag set plus the sentinel `"All"`.
    /// An absent or unrecognized segment behaves as `All`; this never fails.
    pub fn from_segment(segment: Option<&str>) -> Self {
        match segment {
            None | Some("All") => Self::All,
            Some(s) => s.parse::<NoteTag>().map(Self::Tag).unwrap_or(Self::All),
        }
    }

    /// Returns the query-parameter value, or `None` when unfiltered.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Tag(tag) => Some(tag.as_str()),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Tag(tag) => f.write_str(tag.as_str()),
        }
    }
}
