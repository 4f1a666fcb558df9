//! Run configuration: the export-locale column vocabulary and the filter
//! parameters handed in by the caller.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fs, path::Path, str::FromStr};

use crate::process::term::normalize;

/// Lines of report metadata above the Ads header row.
pub const ADS_METADATA_LINES: usize = 2;
/// The Organic header line starts with this (case-insensitive)...
pub const ORGANIC_HEADER_PREFIX: &str = "query,";
/// ...and mentions this column.
pub const ORGANIC_HEADER_TOKEN: &str = "impressions";
pub const ORGANIC_QUERY_COLUMN: &str = "query";
pub const ORGANIC_IMPRESSIONS_COLUMN: &str = "impressions";
pub const ORGANIC_CLICKS_COLUMN: &str = "clicks";

/// Column names of an Ads export in one UI language.
///
/// All names are compared against trimmed, lower-cased headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Search term column; first present candidate wins.
    pub term: Vec<String>,
    /// Optional campaign column.
    #[serde(default)]
    pub campaign: Vec<String>,
    /// Optional interactions (clicks) column.
    #[serde(default)]
    pub interactions: Vec<String>,
    /// Substrings identifying the exposures (impressions) column.
    pub exposures_fragments: Vec<String>,
    /// Summary lines to drop, compared after term normalisation.
    #[serde(default)]
    pub summary_rows: Vec<String>,
}

impl ColumnProfile {
    pub fn danish() -> Self {
        Self {
            term: strings(&["søgeterm"]),
            campaign: strings(&["kampagne"]),
            interactions: strings(&["interaktioner"]),
            exposures_fragments: strings(&["eksp"]),
            summary_rows: strings(&[
                "i alt konto",
                "i alt performance max",
                "i alt søgetermer",
                "i alt andre søgetermer",
                "i alt søg",
                "i alt shopping",
            ]),
        }
    }

    pub fn english() -> Self {
        Self {
            term: strings(&["search term"]),
            campaign: strings(&["campaign"]),
            interactions: strings(&["interactions", "clicks"]),
            exposures_fragments: strings(&["impr"]),
            summary_rows: strings(&[
                "total: account",
                "total: performance max",
                "total: search terms",
                "total: other search terms",
                "total: search",
                "total: shopping",
            ]),
        }
    }

    /// Denylist in the same canonical form as ingested terms.
    pub fn summary_terms(&self) -> BTreeSet<String> {
        self.summary_rows
            .iter()
            .map(|p| normalize(p))
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Lower-case and trim every configured name so hand-written YAML
    /// matches normalised headers.
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.term,
            &mut self.campaign,
            &mut self.interactions,
            &mut self.exposures_fragments,
        ] {
            for name in list.iter_mut() {
                *name = name.trim().to_lowercase();
            }
            list.retain(|n| !n.is_empty());
        }
        self
    }
}

impl Default for ColumnProfile {
    fn default() -> Self {
        Self::danish()
    }
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Built-in profiles selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileName {
    #[default]
    Danish,
    English,
}

impl ProfileName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Danish => "danish",
            Self::English => "english",
        }
    }

    pub fn columns(self) -> ColumnProfile {
        match self {
            Self::Danish => ColumnProfile::danish(),
            Self::English => ColumnProfile::english(),
        }
    }
}

impl FromStr for ProfileName {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "danish" | "da" => Ok(Self::Danish),
            "english" | "en" => Ok(Self::English),
            other => Err(format!(
                "invalid profile '{other}', expected one of: danish, english"
            )),
        }
    }
}

/// Filter thresholds. `None` means no filtering on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ads_exposures: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ads_interactions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_organic_impressions: Option<u64>,
    /// Campaigns to keep; `None` keeps every campaign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_campaigns: Option<BTreeSet<String>>,
}

impl FilterParams {
    /// Allowed campaigns in the same trimmed, lower-cased form as ingested ones.
    pub fn normalized_campaigns(&self) -> Option<BTreeSet<String>> {
        self.allowed_campaigns
            .as_ref()
            .map(|set| set.iter().map(|c| c.trim().to_lowercase()).collect())
    }
}

/// Everything one run needs besides the two exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub profile: ProfileName,
    /// Full column vocabulary; overrides `profile` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnProfile>,
    #[serde(default)]
    pub filters: FilterParams,
}

impl RunConfig {
    pub fn column_profile(&self) -> ColumnProfile {
        match &self.columns {
            Some(custom) => custom.clone().normalized(),
            None => self.profile.columns(),
        }
    }
}

/// Load a YAML run configuration.
pub fn load_run_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
    if raw.trim().is_empty() {
        return Ok(RunConfig::default());
    }
    let config: RunConfig =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing config {:?}", path))?;
    Ok(config)
}
