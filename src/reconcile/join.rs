use serde::Serialize;

use crate::reconcile::aggregate::{AdsAggregate, OrganicAggregate};

/// One Ads `(term, campaign)` with the organic impressions of its term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledRecord {
    pub term: String,
    pub campaign: String,
    pub ads_exposures: u64,
    pub ads_interactions: u64,
    pub organic_impressions: u64,
    /// `organic_impressions > 0`
    pub visible: bool,
}

/// Left-outer join of Ads groups onto organic impressions by term.
///
/// Output follows the Ads aggregate's key order. Organic-only terms are
/// dropped; campaign does not take part in matching.
pub fn reconcile(ads: AdsAggregate, organic: OrganicAggregate) -> Vec<ReconciledRecord> {
    ads.into_iter()
        .map(|((term, campaign), totals)| {
            let organic_impressions = organic.get(&term).unwrap_or(0);
            ReconciledRecord {
                term,
                campaign,
                ads_exposures: totals.exposures,
                ads_interactions: totals.interactions,
                organic_impressions,
                visible: organic_impressions > 0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{AdsRecord, OrganicRecord};
    use crate::reconcile::aggregate::{aggregate_ads, aggregate_organic};

    fn ads(term: &str, campaign: &str, exposures: u64) -> AdsRecord {
        AdsRecord {
            term: term.into(),
            campaign: campaign.into(),
            exposures,
            interactions: 0,
        }
    }

    fn organic(term: &str, impressions: u64) -> OrganicRecord {
        OrganicRecord {
            term: term.into(),
            impressions,
            clicks: 0,
        }
    }

    #[test]
    fn every_ads_group_yields_exactly_one_row() {
        let ads_agg = aggregate_ads(vec![
            ads("sko", "a", 1),
            ads("sko", "b", 2),
            ads("hat", "a", 3),
            ads("sko", "a", 4),
        ]);
        let organic_agg = aggregate_organic(vec![organic("sko", 40), organic("kun organisk", 99)]);
        let keys: Vec<(String, String)> = ads_agg.iter().map(|(k, _)| k.clone()).collect();

        let rows = reconcile(ads_agg, organic_agg);
        let row_keys: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.term.clone(), r.campaign.clone()))
            .collect();
        assert_eq!(row_keys, keys);
        assert!(rows.iter().all(|r| r.term != "kun organisk"));
    }

    #[test]
    fn visibility_follows_matched_impressions() {
        let ads_agg = aggregate_ads(vec![ads("sko", "a", 1), ads("hat", "a", 1), ads("nul", "a", 1)]);
        let organic_agg = aggregate_organic(vec![organic("sko", 40), organic("nul", 0)]);
        let rows = reconcile(ads_agg, organic_agg);

        let by_term = |t: &str| rows.iter().find(|r| r.term == t).cloned().unwrap();
        assert_eq!(by_term("sko").organic_impressions, 40);
        assert!(by_term("sko").visible);
        assert_eq!(by_term("hat").organic_impressions, 0);
        assert!(!by_term("hat").visible);
        // matched but zero is still invisible
        assert!(!by_term("nul").visible);
    }

    #[test]
    fn same_term_in_two_campaigns_gets_the_same_organic_total() {
        let rows = reconcile(
            aggregate_ads(vec![ads("sko", "a", 1), ads("sko", "b", 1)]),
            aggregate_organic(vec![organic("sko", 7)]),
        );
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.organic_impressions == 7));
    }
}
