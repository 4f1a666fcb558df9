use std::collections::BTreeSet;
use tracing::debug;

use crate::{config::FilterParams, reconcile::join::ReconciledRecord};

/// Distinct campaigns in `records`; the default campaign selection.
pub fn campaigns(records: &[ReconciledRecord]) -> BTreeSet<String> {
    records.iter().map(|r| r.campaign.clone()).collect()
}

/// Keep rows passing every threshold, most organic impressions first.
///
/// The sort is stable, so rows with equal impressions keep their join order.
pub fn apply(records: Vec<ReconciledRecord>, params: &FilterParams) -> Vec<ReconciledRecord> {
    let total = records.len();
    let allowed = params.normalized_campaigns();

    let mut kept: Vec<ReconciledRecord> = records
        .into_iter()
        .filter(|r| params.min_ads_exposures.map_or(true, |min| r.ads_exposures >= min))
        .filter(|r| params.min_ads_interactions.map_or(true, |min| r.ads_interactions >= min))
        .filter(|r| {
            params
                .max_organic_impressions
                .map_or(true, |max| r.organic_impressions <= max)
        })
        .filter(|r| allowed.as_ref().map_or(true, |set| set.contains(&r.campaign)))
        .collect();
    kept.sort_by(|a, b| b.organic_impressions.cmp(&a.organic_impressions));

    debug!(total, kept = kept.len(), "filters applied");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(term: &str, campaign: &str, exp: u64, int: u64, org: u64) -> ReconciledRecord {
        ReconciledRecord {
            term: term.into(),
            campaign: campaign.into(),
            ads_exposures: exp,
            ads_interactions: int,
            organic_impressions: org,
            visible: org > 0,
        }
    }

    fn sample() -> Vec<ReconciledRecord> {
        vec![
            row("a", "x", 100, 5, 0),
            row("b", "y", 10, 0, 40),
            row("c", "x", 50, 2, 40),
            row("d", "y", 500, 20, 3),
            row("e", "", 1, 1, 0),
        ]
    }

    fn terms(rows: &[ReconciledRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.term.as_str()).collect()
    }

    #[test]
    fn no_params_keeps_everything_sorted_stably() {
        let out = apply(sample(), &FilterParams::default());
        assert_eq!(terms(&out), vec!["b", "c", "d", "a", "e"]);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let params = FilterParams {
            min_ads_exposures: Some(50),
            min_ads_interactions: Some(2),
            max_organic_impressions: Some(40),
            allowed_campaigns: None,
        };
        assert_eq!(terms(&apply(sample(), &params)), vec!["c", "d", "a"]);
    }

    #[test]
    fn campaign_selection_is_case_insensitive() {
        let params = FilterParams {
            allowed_campaigns: Some([" Y ".to_string()].into_iter().collect()),
            ..Default::default()
        };
        assert_eq!(terms(&apply(sample(), &params)), vec!["b", "d"]);

        let none = FilterParams {
            allowed_campaigns: Some(BTreeSet::new()),
            ..Default::default()
        };
        assert!(apply(sample(), &none).is_empty());
    }

    #[test]
    fn default_campaign_selection_is_every_campaign() {
        let all = campaigns(&sample());
        assert_eq!(all.len(), 3);
        let params = FilterParams {
            allowed_campaigns: Some(all),
            ..Default::default()
        };
        assert_eq!(apply(sample(), &params).len(), sample().len());
    }

    #[test]
    fn raising_min_exposures_never_grows_the_result() {
        let unfiltered = sample();
        let mut previous = usize::MAX;
        for min in [0, 1, 10, 50, 100, 500, 501] {
            let params = FilterParams {
                min_ads_exposures: Some(min),
                ..Default::default()
            };
            let out = apply(sample(), &params);
            assert!(out.len() <= previous);
            assert!(out.iter().all(|r| unfiltered.contains(r)));
            previous = out.len();
        }
        assert_eq!(previous, 0);
    }
}
