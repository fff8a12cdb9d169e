//! Catalog records and grouping configuration.
//!
//! A [`Record`] is one flat catalog entry (a book, a document, a recording).
//! The dataset is loaded once, handed to the aggregator, and never mutated.
//! [`GroupField`] and [`WeightMode`] describe how records are grouped and
//! weighted; they are plain value types so a UI can present them directly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::{self, BuildError, Tree};

/// Reserved key substituted for a missing or empty grouping value.
/// Records are bucketed here, never dropped.
pub const SENTINEL_KEY: &str = "Unknown";

/// One flat catalog entry. All grouping fields are optional; absence maps
/// to [`SENTINEL_KEY`] at aggregation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Word count; the optional weighting dimension.
    #[serde(default)]
    pub words: Option<f64>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// A grouping dimension over [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupField {
    Country,
    Collection,
    ItemType,
    Language,
}

impl GroupField {
    pub const ALL: [GroupField; 4] = [
        GroupField::Country,
        GroupField::Collection,
        GroupField::ItemType,
        GroupField::Language,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GroupField::Country => "Country",
            GroupField::Collection => "Collection",
            GroupField::ItemType => "Type",
            GroupField::Language => "Language",
        }
    }

    /// Grouping key for a record. Empty and whitespace-only values count
    /// as missing.
    pub fn key_of(self, record: &Record) -> Option<&str> {
        let raw = match self {
            GroupField::Country => record.country.as_deref(),
            GroupField::Collection => record.collection.as_deref(),
            GroupField::ItemType => record.item_type.as_deref(),
            GroupField::Language => record.language.as_deref(),
        };
        raw.map(str::trim).filter(|s| !s.is_empty())
    }
}

/// How a record contributes to a node's aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightMode {
    /// Every record contributes 1.
    Count,
    /// Records contribute their word count. Missing or non-finite word
    /// counts contribute 0 but still count toward `item_count`.
    Words,
}

impl WeightMode {
    pub const ALL: [WeightMode; 2] = [WeightMode::Count, WeightMode::Words];

    pub fn label(self) -> &'static str {
        match self {
            WeightMode::Count => "Item count",
            WeightMode::Words => "Word count",
        }
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a dataset from a JSON file containing an array of records.
pub fn load_records(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Build the grouping tree for a dataset under the given ordered grouping
/// fields and weight mode. Thin adapter over [`tree::build`] binding the
/// generic key/weight seams to [`Record`].
pub fn build_tree(
    records: &[Record],
    fields: &[GroupField],
    mode: WeightMode,
) -> Result<Tree, BuildError> {
    let key_fns: Vec<Box<dyn Fn(&Record) -> Result<Option<String>, String>>> = fields
        .iter()
        .map(|&f| {
            Box::new(move |r: &Record| Ok(f.key_of(r).map(str::to_owned)))
                as Box<dyn Fn(&Record) -> Result<Option<String>, String>>
        })
        .collect();

    match mode {
        WeightMode::Count => tree::build(records, &key_fns, None::<tree::NoWeight<Record>>),
        WeightMode::Words => {
            tree::build(records, &key_fns, Some(|r: &Record| Ok(r.words)))
        }
    }
}

/// Small built-in catalog so the app runs without a dataset argument.
pub fn sample_catalog() -> Vec<Record> {
    fn rec(
        title: &str,
        country: &str,
        collection: &str,
        item_type: &str,
        language: &str,
        words: Option<f64>,
        year: i32,
    ) -> Record {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_owned());
        Record {
            title: title.to_owned(),
            country: opt(country),
            collection: opt(collection),
            item_type: opt(item_type),
            language: opt(language),
            words,
            year: Some(year),
        }
    }

    vec![
        rec("Market Day", "Togo", "Readers A", "Storybook", "Ewe", Some(430.0), 2019),
        rec("The River Crossing", "Togo", "Readers A", "Storybook", "Ewe", Some(610.0), 2020),
        rec("Counting Yams", "Togo", "Readers A", "Primer", "Kabiye", Some(180.0), 2018),
        rec("Drum Songs", "Togo", "Readers B", "Audio", "Ewe", None, 2021),
        rec("Two Brothers", "Togo", "Readers B", "Storybook", "Kabiye", Some(540.0), 2021),
        rec("The Clever Hare", "Benin", "Readers A", "Storybook", "Fon", Some(380.0), 2019),
        rec("Harvest Moon", "Benin", "Readers A", "Storybook", "Yoruba", Some(290.0), 2020),
        rec("First Letters", "Benin", "Readers B", "Primer", "Fon", Some(120.0), 2017),
        rec("Lagoon Tales", "Benin", "Readers B", "Storybook", "Fon", Some(820.0), 2022),
        rec("Kente Patterns", "Ghana", "Readers A", "Storybook", "Twi", Some(510.0), 2020),
        rec("The Talking Drum", "Ghana", "Readers A", "Audio", "Twi", None, 2019),
        rec("Spider Stories", "Ghana", "Readers B", "Storybook", "Ewe", Some(730.0), 2021),
        rec("Numbers 1-10", "Ghana", "Readers B", "Primer", "Twi", Some(95.0), 2016),
        rec("Coastal Winds", "Ghana", "Readers C", "Storybook", "Ga", Some(460.0), 2022),
        rec("Sahel Sky", "Burkina Faso", "Readers A", "Storybook", "Moore", Some(350.0), 2018),
        rec("The Old Baobab", "Burkina Faso", "Readers B", "Storybook", "Dioula", Some(640.0), 2021),
        rec("Rainy Season", "Burkina Faso", "Readers B", "Primer", "Moore", Some(210.0), 2019),
        rec("Untitled Field Notes", "", "Readers C", "Document", "", Some(1200.0), 2015),
        rec("Border Songs", "Togo", "", "Audio", "Ewe", None, 2020),
        rec("Alphabet Chart", "Benin", "Readers C", "Primer", "", Some(60.0), 2014),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_fields_count_as_missing() {
        let mut r = sample_catalog().remove(0);
        r.country = None;
        assert_eq!(GroupField::Country.key_of(&r), None);
        r.country = Some("   ".to_owned());
        assert_eq!(GroupField::Country.key_of(&r), None);
        r.country = Some(" Togo ".to_owned());
        assert_eq!(GroupField::Country.key_of(&r), Some("Togo"));
    }

    #[test]
    fn dataset_parses_from_json() {
        let json = r#"[
            {"title": "A", "country": "Togo", "collection": "S1", "type": "Storybook", "words": 120},
            {"title": "B", "language": "Ewe"}
        ]"#;
        let records: Vec<Record> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].words, Some(120.0));
        assert_eq!(records[1].country, None);
        assert_eq!(records[1].language.as_deref(), Some("Ewe"));
    }

    #[test]
    fn build_tree_over_sample_catalog() {
        let records = sample_catalog();
        let tree = build_tree(
            &records,
            &[GroupField::Country, GroupField::Collection],
            WeightMode::Count,
        )
        .unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.item_count, records.len());
        assert!((root.aggregate - records.len() as f64).abs() < 1e-9);
        // One record has a blank country and must land under the sentinel.
        let keys: Vec<&str> = tree
            .children(tree.root())
            .iter()
            .map(|&c| tree.get(c).key.as_str())
            .collect();
        assert!(keys.contains(&SENTINEL_KEY));
    }
}
