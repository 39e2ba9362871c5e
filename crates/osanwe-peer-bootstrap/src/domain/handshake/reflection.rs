//! Aggregation of what other peers report about us.

use std::collections::HashMap;
use std::net::SocketAddrV4;

use super::types::GreetingResponse;

/// Counts observed endpoints across several greetings.
///
/// Peers behind different NATs can disagree; the most reported endpoint
/// wins, ties broken by first report.
#[derive(Debug, Default)]
pub struct ReflectionTally {
    counts: HashMap<SocketAddrV4, (usize, usize)>,
    reports: usize,
}

impl ReflectionTally {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one response.
    pub fn record(&mut self, response: &GreetingResponse) {
        let order = self.reports;
        self.counts
            .entry(response.observed_endpoint())
            .or_insert((0, order))
            .0 += 1;
        self.reports += 1;
    }

    /// Number of responses recorded.
    pub fn reports(&self) -> usize {
        self.reports
    }

    /// Most reported endpoint, if any.
    pub fn consensus(&self) -> Option<SocketAddrV4> {
        self.counts
            .iter()
            .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
                count_a.cmp(count_b).then(first_b.cmp(first_a))
            })
            .map(|(addr, _)| *addr)
    }
}
