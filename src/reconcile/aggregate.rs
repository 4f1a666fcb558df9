use std::collections::{btree_map, BTreeMap};

use crate::ingest::{AdsRecord, OrganicRecord};

/// Summed Ads metrics for one `(term, campaign)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdsTotals {
    pub exposures: u64,
    pub interactions: u64,
}

/// Ads records grouped by `(term, campaign)`, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdsAggregate {
    groups: BTreeMap<(String, String), AdsTotals>,
}

impl AdsAggregate {
    pub fn get(&self, term: &str, campaign: &str) -> Option<&AdsTotals> {
        self.groups.get(&(term.to_string(), campaign.to_string()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &AdsTotals)> {
        self.groups.iter()
    }

    fn add(&mut self, record: AdsRecord) {
        let totals = self.groups.entry((record.term, record.campaign)).or_default();
        totals.exposures = totals.exposures.saturating_add(record.exposures);
        totals.interactions = totals.interactions.saturating_add(record.interactions);
    }
}

impl IntoIterator for AdsAggregate {
    type Item = ((String, String), AdsTotals);
    type IntoIter = btree_map::IntoIter<(String, String), AdsTotals>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl FromIterator<AdsRecord> for AdsAggregate {
    fn from_iter<I: IntoIterator<Item = AdsRecord>>(iter: I) -> Self {
        let mut agg = AdsAggregate::default();
        for record in iter {
            agg.add(record);
        }
        agg
    }
}

/// Organic impressions summed per term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganicAggregate {
    impressions: BTreeMap<String, u64>,
}

impl OrganicAggregate {
    pub fn get(&self, term: &str) -> Option<u64> {
        self.impressions.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.impressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impressions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.impressions.iter()
    }
}

impl FromIterator<OrganicRecord> for OrganicAggregate {
    fn from_iter<I: IntoIterator<Item = OrganicRecord>>(iter: I) -> Self {
        let mut impressions: BTreeMap<String, u64> = BTreeMap::new();
        for record in iter {
            let total = impressions.entry(record.term).or_default();
            *total = total.saturating_add(record.impressions);
        }
        OrganicAggregate { impressions }
    }
}

pub fn aggregate_ads(records: Vec<AdsRecord>) -> AdsAggregate {
    records.into_iter().collect()
}

pub fn aggregate_organic(records: Vec<OrganicRecord>) -> OrganicAggregate {
    records.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ads(term: &str, campaign: &str, exposures: u64, interactions: u64) -> AdsRecord {
        AdsRecord {
            term: term.into(),
            campaign: campaign.into(),
            exposures,
            interactions,
        }
    }

    fn organic(term: &str, impressions: u64) -> OrganicRecord {
        OrganicRecord {
            term: term.into(),
            impressions,
            clicks: 1,
        }
    }

    #[test]
    fn groups_ads_by_term_and_campaign() {
        let agg = aggregate_ads(vec![
            ads("sko", "a", 10, 1),
            ads("sko", "b", 5, 0),
            ads("sko", "a", 7, 2),
            ads("løb", "a", 1, 1),
        ]);
        assert_eq!(agg.len(), 3);
        assert_eq!(
            agg.get("sko", "a"),
            Some(&AdsTotals {
                exposures: 17,
                interactions: 3
            })
        );
        let keys: Vec<_> = agg.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![
                ("løb".to_string(), "a".to_string()),
                ("sko".to_string(), "a".to_string()),
                ("sko".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn sums_organic_per_term_ignoring_clicks() {
        let agg = aggregate_organic(vec![organic("sko", 40), organic("sko", 2), organic("", 9)]);
        assert_eq!(agg.get("sko"), Some(42));
        assert_eq!(agg.get(""), Some(9));
        assert_eq!(agg.get("løb"), None);
    }

    #[test]
    fn aggregation_is_additive_over_batches() {
        let first = vec![ads("sko", "a", 10, 1), ads("løb", "b", 3, 0)];
        let second = vec![ads("løb", "b", 4, 4), ads("sko", "a", 1, 1), ads("hat", "", 2, 0)];

        let whole = aggregate_ads(first.iter().chain(second.iter()).cloned().collect());

        let a = aggregate_ads(first);
        let b = aggregate_ads(second);
        let merged: AdsAggregate = a
            .into_iter()
            .chain(b)
            .map(|((term, campaign), t)| ads(&term, &campaign, t.exposures, t.interactions))
            .collect();
        assert_eq!(merged, whole);

        let mut reversed_input = vec![
            ads("hat", "", 2, 0),
            ads("sko", "a", 1, 1),
            ads("løb", "b", 4, 4),
            ads("løb", "b", 3, 0),
            ads("sko", "a", 10, 1),
        ];
        reversed_input.reverse();
        assert_eq!(aggregate_ads(reversed_input), whole);
    }

    #[test]
    fn organic_aggregation_is_additive_over_batches() {
        let first = vec![organic("sko", 40), organic("løb", 3)];
        let second = vec![organic("løb", 7), organic("sko", 2), organic("hat", 0)];

        let whole = aggregate_organic(first.iter().chain(second.iter()).cloned().collect());

        let a = aggregate_organic(first);
        let b = aggregate_organic(second);
        let merged: OrganicAggregate = a
            .iter()
            .chain(b.iter())
            .map(|(term, impressions)| organic(term, *impressions))
            .collect();
        assert_eq!(merged, whole);
        assert_eq!(whole.get("sko"), Some(42));
        assert_eq!(whole.get("hat"), Some(0));

        let mut reversed_input = vec![
            organic("hat", 0),
            organic("sko", 2),
            organic("løb", 7),
            organic("løb", 3),
            organic("sko", 40),
        ];
        reversed_input.reverse();
        assert_eq!(aggregate_organic(reversed_input), whole);
    }
}
