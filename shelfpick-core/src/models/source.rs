//! Discovery sources and search targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::CredentialKind;

// ============================================================================
// Discovery Source
// ============================================================================

/// Where a discovery listing comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum DiscoverySource {
    /// Library curator picks.
    EditorRecommend,
    /// Commercial catalog bestseller list.
    #[default]
    Bestseller,
    /// Commercial catalog notable new releases.
    ItemNewSpecial,
    /// Bestseller and new releases merged.
    Combined,
}

impl DiscoverySource {
    /// Returns the display name for this source.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::EditorRecommend => "Librarian picks",
            Self::Bestseller => "Bestsellers",
            Self::ItemNewSpecial => "Notable new releases",
            Self::Combined => "Bestsellers + new releases",
        }
    }

    /// Returns the CLI name for this source.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::EditorRecommend => "editor",
            Self::Bestseller => "bestseller",
            Self::ItemNewSpecial => "new",
            Self::Combined => "combined",
        }
    }

    /// Returns all sources.
    pub fn all() -> &'static [DiscoverySource] {
        &[
            Self::EditorRecommend,
            Self::Bestseller,
            Self::ItemNewSpecial,
            Self::Combined,
        ]
    }

    /// Returns the credential this source needs.
    pub fn credential(&self) -> CredentialKind {
        match self {
            Self::EditorRecommend => CredentialKind::Library,
            Self::Bestseller | Self::ItemNewSpecial | Self::Combined => CredentialKind::Catalog,
        }
    }
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for DiscoverySource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "editor" | "editorrecommend" | "library" => Ok(Self::EditorRecommend),
            "bestseller" | "best" => Ok(Self::Bestseller),
            "new" | "itemnewspecial" => Ok(Self::ItemNewSpecial),
            "combined" | "all" => Ok(Self::Combined),
            other => Err(CoreError::UnknownValue(format!("source '{other}'"))),
        }
    }
}

// ============================================================================
// Search Target
// ============================================================================

/// Which field a catalog search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SearchTarget {
    /// Free keyword.
    #[default]
    Keyword,
    /// Title only.
    Title,
    /// Author only.
    Author,
    /// Publisher only.
    Publisher,
}

impl SearchTarget {
    /// Returns the catalog's `QueryType` value.
    pub fn query_type(&self) -> &'static str {
        match self {
            Self::Keyword => "Keyword",
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Publisher => "Publisher",
        }
    }

    /// Returns all targets.
    pub fn all() -> &'static [SearchTarget] {
        &[Self::Keyword, Self::Title, Self::Author, Self::Publisher]
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_type())
    }
}

impl FromStr for SearchTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|t| t.query_type().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| CoreError::UnknownValue(format!("search target '{s}'")))
    }
}
