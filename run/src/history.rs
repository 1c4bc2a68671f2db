use std::collections::VecDeque;

use fleetcrawl_core::GateRewardRecord;

/// Records kept before the oldest is evicted.
pub const REWARD_HISTORY_CAPACITY: usize = 64;

/// Append-only ring of resolved gates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardHistory {
    records: VecDeque<GateRewardRecord>,
}

impl RewardHistory {
    pub(crate) fn push(&mut self, record: GateRewardRecord) {
        if self.records.len() == REWARD_HISTORY_CAPACITY {
            let _ = self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &GateRewardRecord> {
        self.records.iter()
    }

    /// Number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Reports whether no gate was resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    #[must_use]
    pub fn latest(&self) -> Option<&GateRewardRecord> {
        self.records.back()
    }
}
