use crate::matcher::FailureRecord;
use crate::stats::{FrequencyTable, RankedEntry};

pub const DEFAULT_TOP_N: usize = 5;

/// Counts gathered from every matched line of one log.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub total_failures: u64,
    pub top_addresses: Vec<RankedEntry>,
    pub top_usernames: Vec<RankedEntry>,
    pub address_counts: FrequencyTable,
}

/// Incremental form of [`aggregate`], fed one record at a time while a log is read.
#[derive(Debug, Default)]
pub struct Aggregator {
    total_failures: u64,
    addresses: FrequencyTable,
    usernames: FrequencyTable,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &FailureRecord) {
        self.total_failures += 1;
        self.addresses.record(&record.address);
        self.usernames.record(&record.username);
    }

    pub fn total_failures(&self) -> u64 {
        self.total_failures
    }

    pub fn finish(self, top_n: usize) -> Aggregate {
        Aggregate {
            total_failures: self.total_failures,
            top_addresses: self.addresses.top(top_n),
            top_usernames: self.usernames.top(top_n),
            address_counts: self.addresses,
        }
    }
}

pub fn aggregate<'a, I>(records: I, top_n: usize) -> Aggregate
where
    I: IntoIterator<Item = &'a FailureRecord>,
{
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.push(record);
    }
    aggregator.finish(top_n)
}
