//! Route inventory loading.
//!
//! `seo/inventory.csv` has one row per public route with the columns written
//! by the inventory generator:
//!
//! ```text
//! route,title,final_title,meta_description,canonical,h1,robots,
//! indexability_class,title_issues,description_issues,structured_data
//! ```
//!
//! Rows are kept as column maps so extra or missing columns never break
//! loading; a missing column reads as an empty string.

use super::SeoError;
use super::csv::parse_csv;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Header row the inventory generator writes.
pub const INVENTORY_COLUMNS: [&str; 11] = [
    "route",
    "title",
    "final_title",
    "meta_description",
    "canonical",
    "h1",
    "robots",
    "indexability_class",
    "title_issues",
    "description_issues",
    "structured_data",
];

/// Value of the `indexability_class` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indexability {
    Indexable,
    UtilityNoindex,
    Other(String),
}

impl Indexability {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "indexable" => Indexability::Indexable,
            "utility_noindex" => Indexability::UtilityNoindex,
            other => Indexability::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Indexability::Indexable => "indexable",
            Indexability::UtilityNoindex => "utility_noindex",
            Indexability::Other(other) => other,
        }
    }

    /// Classification derived from a `robots` directive such as `noindex,follow`.
    pub fn from_robots(robots: &str) -> Self {
        let noindex = robots
            .split(',')
            .any(|directive| directive.trim().eq_ignore_ascii_case("noindex"));
        if noindex {
            Indexability::UtilityNoindex
        } else {
            Indexability::Indexable
        }
    }
}

/// One inventory record keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryRow {
    fields: HashMap<String, String>,
}

impl InventoryRow {
    pub fn from_pairs<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Column value, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn route(&self) -> &str {
        self.get("route")
    }

    pub fn final_title(&self) -> &str {
        self.get("final_title")
    }

    pub fn meta_description(&self) -> &str {
        self.get("meta_description")
    }

    pub fn canonical(&self) -> &str {
        self.get("canonical")
    }

    /// `indexability_class`, or the `robots` directive when the class is blank.
    pub fn indexability(&self) -> Indexability {
        let class = self.get("indexability_class");
        let robots = self.get("robots");
        if class.trim().is_empty() && !robots.trim().is_empty() {
            Indexability::from_robots(robots)
        } else {
            Indexability::parse(class)
        }
    }
}

/// Turn parsed CSV rows into records using the first row as the header.
/// Fewer than two rows means no records.
pub fn rows_from_csv(rows: Vec<Vec<String>>) -> Vec<InventoryRow> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    rows.map(|values| {
        InventoryRow::from_pairs(
            header
                .iter()
                .enumerate()
                .map(|(idx, column)| (column.clone(), values.get(idx).cloned().unwrap_or_default())),
        )
    })
    .collect()
}

/// Read the inventory CSV. A missing file is a hard error.
pub fn read_inventory(path: &Path) -> Result<Vec<InventoryRow>, SeoError> {
    if !path.exists() {
        return Err(SeoError::MissingInventory(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(rows_from_csv(parse_csv(&content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn header_only_means_no_rows() {
        assert!(rows_from_csv(parse_csv("route,final_title\n")).is_empty());
        assert!(rows_from_csv(Vec::new()).is_empty());
    }

    #[test]
    fn short_rows_fill_missing_columns_with_empty() {
        let rows = rows_from_csv(parse_csv("route,final_title,canonical\n/about,About | Prism\n"));
        assert_eq!(rows[0].route(), "/about");
        assert_eq!(rows[0].final_title(), "About | Prism");
        assert_eq!(rows[0].canonical(), "");
        assert_eq!(rows[0].get("nonexistent"), "");
    }

    #[test]
    fn indexability_classes() {
        assert_eq!(Indexability::parse("indexable"), Indexability::Indexable);
        assert_eq!(Indexability::parse("utility_noindex"), Indexability::UtilityNoindex);
        assert_eq!(
            Indexability::parse("redirect"),
            Indexability::Other("redirect".into())
        );
        assert_eq!(Indexability::from_robots("noindex"), Indexability::UtilityNoindex);
        assert_eq!(Indexability::from_robots("index,follow"), Indexability::Indexable);
        assert_eq!(
            Indexability::from_robots("NOINDEX, nofollow"),
            Indexability::UtilityNoindex
        );
    }

    #[test]
    fn blank_class_falls_back_to_robots() {
        let row = InventoryRow::from_pairs([("route", "/thanks"), ("robots", "noindex,nofollow")]);
        assert_eq!(row.indexability(), Indexability::UtilityNoindex);
        let row = InventoryRow::from_pairs([
            ("route", "/old"),
            ("robots", "noindex"),
            ("indexability_class", "redirect"),
        ]);
        assert_eq!(row.indexability(), Indexability::Other("redirect".into()));
    }

    #[test]
    fn missing_inventory_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seo/inventory.csv");
        assert!(matches!(read_inventory(&path), Err(SeoError::MissingInventory(p)) if p == path));
    }

    #[test]
    fn read_inventory_parses_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("inventory.csv");
        fs::write(
            &path,
            "\"route\",\"indexability_class\"\n\"/thank-you\",\"utility_noindex\"\n",
        )
        .unwrap();
        let rows = read_inventory(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].indexability(), Indexability::UtilityNoindex);
    }
}
