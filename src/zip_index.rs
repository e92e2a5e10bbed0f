//! ZIP code lookup: zipcode -> every ZIP record sharing it

use crate::models::ZipRecord;
use std::collections::HashMap;

/// ZIP records grouped by zipcode, in file order within each group
#[derive(Debug, Default)]
pub struct ZipIndex {
    by_zipcode: HashMap<String, Vec<ZipRecord>>,
    record_count: usize,
}

impl ZipIndex {
    pub fn build(records: impl IntoIterator<Item = ZipRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            index
                .by_zipcode
                .entry(record.zipcode.clone())
                .or_default()
                .push(record);
            index.record_count += 1;
        }
        index
    }

    /// All records for `zipcode`, empty when the zipcode is unknown
    pub fn lookup(&self, zipcode: &str) -> &[ZipRecord] {
        self.by_zipcode
            .get(zipcode)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct zipcodes
    pub fn len(&self) -> usize {
        self.by_zipcode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zipcode.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
