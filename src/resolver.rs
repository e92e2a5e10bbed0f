//! Second-lowest-cost plan resolution
//!
//! A zipcode resolves to a rate only when every ZIP record sharing it lands in
//! the same rate area. Rates of the target tier in that area are deduplicated,
//! sorted, and the second smallest is taken (or the only one, if just one
//! distinct rate exists).

use crate::models::{MetalLevel, SlcspRequest};
use crate::plan_index::PlanIndex;
use crate::zip_index::ZipIndex;
use tracing::{debug, info};

/// Outcome of resolving one zipcode
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Rate(f64),
    /// Zipcode is not in the ZIP table
    NoZipData,
    /// Zipcode spans more than one rate area, so it has no single SLCSP
    AmbiguousRateArea { first: String, conflicting: String },
    /// Rate area has no plans of the target tier
    NoTierMatch,
}

impl Resolution {
    pub fn rate(&self) -> Option<f64> {
        match self {
            Resolution::Rate(rate) => Some(*rate),
            _ => None,
        }
    }
}

/// Per-outcome counts for a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    pub resolved: usize,
    pub no_zip_data: usize,
    pub ambiguous: usize,
    pub no_tier_match: usize,
}

impl ResolutionSummary {
    pub fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Rate(_) => self.resolved += 1,
            Resolution::NoZipData => self.no_zip_data += 1,
            Resolution::AmbiguousRateArea { .. } => self.ambiguous += 1,
            Resolution::NoTierMatch => self.no_tier_match += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.resolved + self.no_zip_data + self.ambiguous + self.no_tier_match
    }
}

/// Joins ZIP records to plans and picks the benchmark rate
pub struct RateResolver<'a> {
    zips: &'a ZipIndex,
    plans: &'a PlanIndex,
    tier: MetalLevel,
}

impl<'a> RateResolver<'a> {
    pub fn new(zips: &'a ZipIndex, plans: &'a PlanIndex) -> Self {
        Self {
            zips,
            plans,
            tier: MetalLevel::Silver,
        }
    }

    pub fn with_tier(mut self, tier: MetalLevel) -> Self {
        self.tier = tier;
        self
    }

    pub fn tier(&self) -> &MetalLevel {
        &self.tier
    }

    pub fn resolve(&self, zipcode: &str) -> Resolution {
        let zip_records = self.zips.lookup(zipcode);
        if zip_records.is_empty() {
            info!("Could not find any data for zipcode: {}", zipcode);
            return Resolution::NoZipData;
        }

        let mut rates: Vec<f64> = Vec::new();
        let mut rate_area_seen: Option<&str> = None;

        for zip_record in zip_records {
            match rate_area_seen {
                None => rate_area_seen = Some(zip_record.rate_area.as_str()),
                Some(first) if first != zip_record.rate_area => {
                    info!(
                        "Found conflicting rate areas ({}, {}) for same zipcode: {}",
                        first, zip_record.rate_area, zipcode
                    );
                    return Resolution::AmbiguousRateArea {
                        first: first.to_string(),
                        conflicting: zip_record.rate_area.clone(),
                    };
                }
                Some(_) => {}
            }

            rates.extend(
                self.plans
                    .lookup(&zip_record.state, &zip_record.rate_area)
                    .iter()
                    .filter(|plan| plan.metal_level == self.tier)
                    .map(|plan| plan.rate),
            );
        }

        match second_lowest(rates) {
            Some(rate) => {
                debug!("SLCSP for zipcode {}: {}", zipcode, rate);
                Resolution::Rate(rate)
            }
            None => {
                info!(
                    "Could not find any {} rates for zipcode: {}",
                    self.tier.to_string().to_lowercase(),
                    zipcode
                );
                Resolution::NoTierMatch
            }
        }
    }

    /// Resolves `request.zipcode` and stores the rate (or clears it)
    pub fn resolve_request(&self, request: &mut SlcspRequest) -> Resolution {
        let resolution = self.resolve(&request.zipcode);
        request.rate = resolution.rate();
        resolution
    }

    /// Resolves every request in order
    pub fn resolve_all(&self, requests: &mut [SlcspRequest]) -> ResolutionSummary {
        let mut summary = ResolutionSummary::default();
        for request in requests.iter_mut() {
            let resolution = self.resolve_request(request);
            summary.record(&resolution);
        }
        summary
    }
}

/// Second smallest distinct rate, or the only one when all rates are equal.
/// Equality is exact on the parsed value.
fn second_lowest(mut rates: Vec<f64>) -> Option<f64> {
    rates.sort_by(f64::total_cmp);
    rates.dedup();
    match rates.as_slice() {
        [] => None,
        [only] => Some(*only),
        [_, second, ..] => Some(*second),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanRecord, ZipRecord};

    fn zip(zipcode: &str, state: &str, rate_area: &str) -> ZipRecord {
        ZipRecord {
            zipcode: zipcode.to_string(),
            state: state.to_string(),
            county_code: "00000".to_string(),
            rate_area: rate_area.to_string(),
        }
    }

    fn plan(state: &str, metal_level: &str, rate: f64, rate_area: &str) -> PlanRecord {
        PlanRecord {
            plan_id: format!("{}-{}-{}", state, rate_area, rate),
            state: state.to_string(),
            metal_level: MetalLevel::from(metal_level),
            rate,
            rate_area: rate_area.to_string(),
        }
    }

    fn fixture() -> (ZipIndex, PlanIndex) {
        let zips = ZipIndex::build(vec![
            zip("64148", "MO", "3"),
            zip("17201", "PA", "4"),
            zip("36749", "AL", "1"),
            zip("36749", "AL", "2"),
            zip("30012", "GA", "7"),
        ]);
        let plans = PlanIndex::build(vec![
            plan("MO", "Silver", 198.88, "3"),
            plan("MO", "Silver", 205.77, "3"),
            plan("MO", "Silver", 198.88, "3"),
            plan("MO", "Gold", 150.00, "3"),
            plan("PA", "Silver", 189.22, "4"),
            plan("PA", "Bronze", 120.00, "4"),
            plan("AL", "Silver", 250.00, "1"),
            plan("AL", "Silver", 260.00, "1"),
            plan("AL", "Silver", 270.00, "2"),
            plan("GA", "Gold", 310.00, "7"),
            plan("GA", "Bronze", 210.00, "7"),
        ]);
        (zips, plans)
    }

    #[test]
    fn test_second_lowest_after_dedup() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans);
        assert_eq!(resolver.resolve("64148"), Resolution::Rate(205.77));
    }

    #[test]
    fn test_single_rate_is_used_directly() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans);
        assert_eq!(resolver.resolve("17201"), Resolution::Rate(189.22));
    }

    #[test]
    fn test_conflicting_rate_areas_yield_nothing() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans);
        assert_eq!(
            resolver.resolve("36749"),
            Resolution::AmbiguousRateArea {
                first: "1".to_string(),
                conflicting: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_conflict_after_agreeing_records_discards_rates() {
        let zips = ZipIndex::build(vec![
            zip("54923", "WI", "11"),
            zip("54923", "WI", "11"),
            zip("54923", "WI", "15"),
            zip("54923", "WI", "11"),
        ]);
        let plans = PlanIndex::build(vec![
            plan("WI", "Silver", 300.0, "11"),
            plan("WI", "Silver", 310.0, "11"),
        ]);
        let resolver = RateResolver::new(&zips, &plans);

        let resolution = resolver.resolve("54923");
        assert!(matches!(resolution, Resolution::AmbiguousRateArea { .. }));
        assert_eq!(resolution.rate(), None);
    }

    #[test]
    fn test_unknown_zipcode() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans);
        assert_eq!(resolver.resolve("99999"), Resolution::NoZipData);
    }

    #[test]
    fn test_no_silver_plans() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans);
        assert_eq!(resolver.resolve("30012"), Resolution::NoTierMatch);
    }

    #[test]
    fn test_zip_without_any_plans() {
        let zips = ZipIndex::build(vec![zip("10001", "NY", "1")]);
        let plans = PlanIndex::default();
        let resolver = RateResolver::new(&zips, &plans);
        assert_eq!(resolver.resolve("10001"), Resolution::NoTierMatch);
    }

    #[test]
    fn test_same_rate_area_across_counties() {
        // Two counties, same area: plans are collected twice, dedup removes the repeats
        let zips = ZipIndex::build(vec![zip("31503", "GA", "9"), zip("31503", "GA", "9")]);
        let plans = PlanIndex::build(vec![
            plan("GA", "Silver", 280.0, "9"),
            plan("GA", "Silver", 290.0, "9"),
        ]);
        let resolver = RateResolver::new(&zips, &plans);
        assert_eq!(resolver.resolve("31503"), Resolution::Rate(290.0));
    }

    #[test]
    fn test_state_is_part_of_join() {
        let zips = ZipIndex::build(vec![zip("64148", "MO", "3")]);
        let plans = PlanIndex::build(vec![
            plan("KS", "Silver", 100.0, "3"),
            plan("MO", "Silver", 200.0, "3"),
        ]);
        let resolver = RateResolver::new(&zips, &plans);
        assert_eq!(resolver.resolve("64148"), Resolution::Rate(200.0));
    }

    #[test]
    fn test_custom_tier() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans).with_tier(MetalLevel::Bronze);
        assert_eq!(resolver.tier(), &MetalLevel::Bronze);
        assert_eq!(resolver.resolve("30012"), Resolution::Rate(210.0));
        assert_eq!(resolver.resolve("64148"), Resolution::NoTierMatch);
    }

    #[test]
    fn test_resolve_request_overwrites_stale_rate() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans);

        let mut request = SlcspRequest {
            zipcode: "99999".to_string(),
            rate: Some(1.0),
        };
        resolver.resolve_request(&mut request);
        assert_eq!(request.rate, None);

        let mut request = SlcspRequest::new("64148");
        resolver.resolve_request(&mut request);
        assert_eq!(request.rate, Some(205.77));
    }

    #[test]
    fn test_resolve_all_keeps_order_and_counts() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans);

        let mut requests: Vec<SlcspRequest> = ["64148", "17201", "36749", "99999", "30012"]
            .iter()
            .map(|z| SlcspRequest::new(*z))
            .collect();
        let summary = resolver.resolve_all(&mut requests);

        let zipcodes: Vec<&str> = requests.iter().map(|r| r.zipcode.as_str()).collect();
        assert_eq!(zipcodes, vec!["64148", "17201", "36749", "99999", "30012"]);
        let rates: Vec<Option<f64>> = requests.iter().map(|r| r.rate).collect();
        assert_eq!(rates, vec![Some(205.77), Some(189.22), None, None, None]);

        assert_eq!(
            summary,
            ResolutionSummary {
                resolved: 2,
                no_zip_data: 1,
                ambiguous: 1,
                no_tier_match: 1,
            }
        );
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let (zips, plans) = fixture();
        let resolver = RateResolver::new(&zips, &plans);

        let mut requests: Vec<SlcspRequest> = ["64148", "36749", "17201"]
            .iter()
            .map(|z| SlcspRequest::new(*z))
            .collect();
        resolver.resolve_all(&mut requests);
        let first = requests.clone();
        resolver.resolve_all(&mut requests);
        assert_eq!(requests, first);
    }

    #[test]
    fn test_second_lowest_helper() {
        assert_eq!(second_lowest(vec![]), None);
        assert_eq!(second_lowest(vec![3.0]), Some(3.0));
        assert_eq!(second_lowest(vec![3.0, 3.0, 3.0]), Some(3.0));
        assert_eq!(second_lowest(vec![5.0, 1.0, 3.0, 1.0]), Some(3.0));
    }
}
