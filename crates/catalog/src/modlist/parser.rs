//! Wabbajack modlist JSON parser
//!
//! Only the archive list is modelled. Every archive field is optional so that
//! archives from non-Nexus sources (which carry no `ModID`) still parse.

use serde::Deserialize;

use crate::common::{CatalogError, Result};

/// Raw modlist JSON structure as it appears in the file
#[derive(Debug, Deserialize)]
pub struct Modlist {
    #[serde(rename = "Archives")]
    pub archives: Vec<Archive>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "GameName", default)]
    pub game: Option<String>,
}

/// Raw archive entry from the JSON
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Archive {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    #[serde(rename = "State", default)]
    pub state: Option<ArchiveState>,
}

/// Downloader state attached to an archive
///
/// Only the Nexus fields are kept; other `$type` payloads deserialize to an
/// empty state.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ArchiveState {
    #[serde(rename = "Description", default)]
    pub description: Option<String>,

    #[serde(rename = "ModID", default)]
    pub mod_id: Option<u64>,
}

impl Archive {
    pub fn description(&self) -> Option<&str> {
        self.state.as_ref().and_then(|s| s.description.as_deref())
    }

    pub fn mod_id(&self) -> Option<u64> {
        self.state.as_ref().and_then(|s| s.mod_id)
    }
}

/// Parse a modlist document; fails if it is not JSON or has no `Archives`
pub fn parse_modlist(json: &str) -> Result<Modlist> {
    serde_json::from_str(json).map_err(|e| CatalogError::Json {
        context: "modlist document".to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nexus_and_http_archives() {
        let json = r#"{
            "Name": "Baseline",
            "GameName": "SkyrimSpecialEdition",
            "Archives": [
                {
                    "Hash": "h5C1sOVi8K8=",
                    "Name": "SkyUI_5_2_SE-12604-5-2SE.7z",
                    "Size": 2838574,
                    "State": {
                        "$type": "NexusDownloader, Wabbajack.Lib",
                        "Description": "Elegant, PC-friendly interface mod",
                        "ModID": 12604,
                        "FileID": 35407,
                        "GameName": "SkyrimSpecialEdition"
                    }
                },
                {
                    "Name": "some_patch.zip",
                    "State": {
                        "$type": "HttpDownloader, Wabbajack.Lib",
                        "Url": "https://example.com/some_patch.zip"
                    }
                }
            ],
            "Directives": []
        }"#;

        let modlist = parse_modlist(json).unwrap();
        assert_eq!(modlist.name.as_deref(), Some("Baseline"));
        assert_eq!(modlist.archives.len(), 2);

        let skyui = &modlist.archives[0];
        assert_eq!(skyui.name.as_deref(), Some("SkyUI_5_2_SE-12604-5-2SE.7z"));
        assert_eq!(skyui.description(), Some("Elegant, PC-friendly interface mod"));
        assert_eq!(skyui.mod_id(), Some(12604));

        let http = &modlist.archives[1];
        assert_eq!(http.description(), None);
        assert_eq!(http.mod_id(), None);
    }

    #[test]
    fn test_archive_without_state() {
        let modlist = parse_modlist(r#"{"Archives": [{"Name": "loose.7z"}, {}]}"#).unwrap();
        assert_eq!(modlist.archives.len(), 2);
        assert!(modlist.archives[0].state.is_none());
        assert!(modlist.archives[1].name.is_none());
    }

    #[test]
    fn test_missing_archives_key_fails() {
        match parse_modlist(r#"{"Directives": []}"#) {
            Err(CatalogError::Json { source, .. }) => assert!(source.to_string().contains("Archives")),
            other => panic!("Expected Json error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(parse_modlist("not json at all").is_err());
    }
}
