//! Disease catalog configuration
//!
//! This module holds the static mapping from a disease identifier to its
//! tracked search keywords and baseline factor. A built-in catalog covers
//! flu, dengue and covid; deployments can replace it with a TOML file.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel::config::DiseaseCatalog;
//!
//! let catalog = DiseaseCatalog::default();
//! let dengue = catalog.get("dengue").expect("built-in disease");
//! assert_eq!(dengue.keywords.len(), 4);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Keyword set and scoring parameters for a single disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseConfig {
    /// Ordered list of search keywords tracked for this disease
    pub keywords: Vec<String>,

    /// Baseline adjustment factor (carried in configuration, not used by
    /// the current scoring math)
    pub baseline_factor: f64,
}

impl DiseaseConfig {
    /// Create a config from string-like keywords
    pub fn new<I, S>(keywords: I, baseline_factor: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            baseline_factor,
        }
    }
}

/// Static mapping from disease identifier to its configuration
///
/// A `BTreeMap` keeps disease listings in stable order for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseCatalog {
    /// Disease id -> configuration
    pub diseases: BTreeMap<String, DiseaseConfig>,
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        let mut diseases = BTreeMap::new();

        diseases.insert(
            "flu".to_string(),
            DiseaseConfig::new(
                ["flu symptoms", "fever and cough", "influenza treatment", "Tamifu"],
                1.2,
            ),
        );
        diseases.insert(
            "dengue".to_string(),
            DiseaseConfig::new(
                [
                    "dengue symptoms",
                    "mosquito bite fever",
                    "platelet count low",
                    "dengue treatment",
                ],
                1.5,
            ),
        );
        diseases.insert(
            "covid".to_string(),
            DiseaseConfig::new(
                ["covid symptoms", "loss of smell", "covid test near me", "Paxlovid"],
                1.3,
            ),
        );

        Self { diseases }
    }
}

impl DiseaseCatalog {
    /// Look up a disease by identifier
    pub fn get(&self, id: &str) -> Option<&DiseaseConfig> {
        self.diseases.get(id)
    }

    /// Check whether a disease id is configured
    pub fn contains(&self, id: &str) -> bool {
        self.diseases.contains_key(id)
    }

    /// All configured disease ids, in stable order
    pub fn ids(&self) -> Vec<&str> {
        self.diseases.keys().map(String::as_str).collect()
    }

    /// Number of configured diseases
    pub fn len(&self) -> usize {
        self.diseases.len()
    }

    /// Check whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
    }

    /// Load a catalog from a TOML file
    ///
    /// Expected shape:
    ///
    /// ```toml
    /// [diseases.flu]
    /// keywords = ["flu symptoms", "fever and cough"]
    /// baseline_factor = 1.2
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let catalog: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate catalog contents
    pub fn validate(&self) -> Result<()> {
        if self.diseases.is_empty() {
            anyhow::bail!("Disease catalog must configure at least one disease");
        }
        for (id, config) in &self.diseases {
            if config.keywords.is_empty() {
                anyhow::bail!("Disease '{id}' has no keywords configured");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_catalog_has_three_diseases() {
        let catalog = DiseaseCatalog::default();
        assert_eq!(catalog.ids(), vec!["covid", "dengue", "flu"]);
        for id in catalog.ids() {
            assert_eq!(catalog.get(id).unwrap().keywords.len(), 4);
        }
    }

    #[test]
    fn test_unknown_disease_not_found() {
        let catalog = DiseaseCatalog::default();
        assert!(catalog.get("ebola").is_none());
        assert!(!catalog.contains("ebola"));
    }

    #[test]
    fn test_keyword_order_preserved() {
        let catalog = DiseaseCatalog::default();
        let dengue = catalog.get("dengue").unwrap();
        assert_eq!(dengue.keywords[0], "dengue symptoms");
        assert_eq!(dengue.keywords[3], "dengue treatment");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[diseases.malaria]
keywords = ["malaria symptoms", "chills and fever"]
baseline_factor = 1.4
"#
        )
        .unwrap();

        let catalog = DiseaseCatalog::from_toml_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        let malaria = catalog.get("malaria").unwrap();
        assert_eq!(malaria.keywords.len(), 2);
        assert!((malaria.baseline_factor - 1.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[diseases.bad]
keywords = []
baseline_factor = 1.0
"#
        )
        .unwrap();

        assert!(DiseaseCatalog::from_toml_file(file.path()).is_err());
    }

    #[test]
    fn test_default_catalog_validates() {
        assert!(DiseaseCatalog::default().validate().is_ok());
    }
}
