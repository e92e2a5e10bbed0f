//! Coverage plan lookup keyed by (state, rate area)

use crate::models::{MetalLevel, PlanRecord, RateAreaKey};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PlanIndex {
    by_rate_area: HashMap<RateAreaKey, Vec<PlanRecord>>,
    record_count: usize,
}

impl PlanIndex {
    pub fn build(records: impl IntoIterator<Item = PlanRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            index
                .by_rate_area
                .entry(record.rate_area_key())
                .or_default()
                .push(record);
            index.record_count += 1;
        }
        index
    }

    /// Plans filed in `rate_area` of `state`, empty when none are known
    pub fn lookup(&self, state: &str, rate_area: &str) -> &[PlanRecord] {
        self.lookup_key(&RateAreaKey::new(state, rate_area))
    }

    pub fn lookup_key(&self, key: &RateAreaKey) -> &[PlanRecord] {
        self.by_rate_area
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if any plan in the table has this metal level
    pub fn contains_tier(&self, tier: &MetalLevel) -> bool {
        self.by_rate_area
            .values()
            .flatten()
            .any(|plan| &plan.metal_level == tier)
    }

    /// Number of distinct rate areas
    pub fn len(&self) -> usize {
        self.by_rate_area.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rate_area.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
