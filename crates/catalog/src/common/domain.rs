//! Nexus game domain identifier

use std::fmt;
use std::str::FromStr;

use crate::common::{CatalogError, Result};

/// Slug identifying a game's mod repository on Nexus (e.g. `skyrimspecialedition`)
///
/// The slug ends up both in request URLs and in the category cache file name,
/// so anything that could escape either is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameDomain(String);

impl GameDomain {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::Configuration {
                message: "game domain name is empty".to_string(),
                field: Some("game_domain_name".to_string()),
                suggestion: Some("Pass the game's Nexus slug, e.g. 'skyrimspecialedition'".to_string()),
            });
        }

        if let Some(bad) = trimmed.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
            return Err(CatalogError::Configuration {
                message: format!("game domain name '{}' contains invalid character '{}'", trimmed, bad),
                field: Some("game_domain_name".to_string()),
                suggestion: Some("Use the slug from the game's Nexus URL (letters, digits, '-' and '_')".to_string()),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for GameDomain {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for GameDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
