//! Projection of modlist archives into CSV rows

use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::common::files::{create_truncated, read_to_string};
use crate::common::{CatalogError, Result};
use crate::modlist::parser::{parse_modlist, Modlist};

/// Header row of the extracted CSV
pub const EXTRACTED_HEADERS: [&str; 3] = ["Name", "Description", "modID"];

/// One archive flattened to three columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRow {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "modID")]
    pub mod_id: Option<u64>,
}

/// One row per archive, in document order
pub fn extract_rows(modlist: &Modlist) -> Vec<ExtractedRow> {
    modlist
        .archives
        .iter()
        .map(|archive| ExtractedRow {
            name: archive.name.clone(),
            description: archive.description().map(str::to_string),
            mod_id: archive.mod_id(),
        })
        .collect()
}

/// Write the header and all rows, truncating `path`. Returns the row count.
pub fn write_extracted_csv(path: &Path, rows: &[ExtractedRow]) -> Result<usize> {
    let file = create_truncated(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(EXTRACTED_HEADERS)
        .map_err(|e| CatalogError::csv(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| CatalogError::csv(path, e))?;
    }
    writer.flush()
        .map_err(|e| CatalogError::csv(path, csv::Error::from(e)))?;

    Ok(rows.len())
}

/// Read a modlist document from `input` and write its archives to `output`
pub fn flatten_modlist(input: &Path, output: &Path) -> Result<usize> {
    let json = read_to_string(input)?;
    debug!("Loaded modlist file {} ({} bytes)", input.display(), json.len());

    let modlist = parse_modlist(&json)?;
    let rows = extract_rows(&modlist);
    let written = write_extracted_csv(output, &rows)?;

    info!("Data successfully written to {} ({} archives)", output.display(), written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scenario_row() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("modlist");
        let output = dir.path().join("extracted_data_with_id.csv");
        std::fs::write(
            &input,
            r#"{"Archives":[{"Name":"Test Mod","State":{"Description":"desc","ModID":42}}]}"#,
        ).unwrap();

        let written = flatten_modlist(&input, &output).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["Name,Description,modID", "Test Mod,desc,42"]);
    }

    #[test]
    fn test_order_preserved_and_missing_keys_empty() {
        let modlist = parse_modlist(r#"{"Archives": [
            {"Name": "first.7z", "State": {"Description": "one", "ModID": 1}},
            {"Name": "second.zip", "State": {"Url": "https://example.com"}},
            {"State": {"ModID": 3}},
            {"Name": "first.7z", "State": {"Description": "one", "ModID": 1}}
        ]}"#).unwrap();

        let rows = extract_rows(&modlist);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].name.as_deref(), Some("first.7z"));
        assert_eq!(rows[1].description, None);
        assert_eq!(rows[1].mod_id, None);
        assert_eq!(rows[2].name, None);
        assert_eq!(rows[2].mod_id, Some(3));
        // duplicates are kept
        assert_eq!(rows[0], rows[3]);

        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");
        write_extracted_csv(&output, &rows).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec![
            "Name,Description,modID",
            "first.7z,one,1",
            "second.zip,,",
            ",,3",
            "first.7z,one,1",
        ]);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let rows = vec![ExtractedRow {
            name: Some("Armor, Weapons and More".to_string()),
            description: Some("says \"hi\"".to_string()),
            mod_id: Some(7),
        }];

        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");
        write_extracted_csv(&output, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Armor, Weapons and More");
        assert_eq!(&record[1], "says \"hi\"");
        assert_eq!(&record[2], "7");
    }

    #[test]
    fn test_empty_archive_list_writes_header_only() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");
        assert_eq!(write_extracted_csv(&output, &[]).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap().trim_end(), "Name,Description,modID");
    }

    #[test]
    fn test_missing_input_is_file_error() {
        let dir = tempdir().unwrap();
        let result = flatten_modlist(&dir.path().join("missing"), &dir.path().join("out.csv"));
        assert!(matches!(result, Err(CatalogError::FileSystem { .. })));
    }
}
