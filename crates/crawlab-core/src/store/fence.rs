// ── Request fencing ──
//
// Each fetch that commits state takes a ticket on its channel before it
// awaits the transport. Under `LatestIssued`, only the holder of the newest
// ticket on a channel may commit.

use dashmap::DashMap;

use crate::config::RequestFencing;

/// Proof that a request was issued, and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    channel: &'static str,
    generation: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Fence {
    policy: RequestFencing,
    generations: DashMap<&'static str, u64>,
}

impl Fence {
    pub(crate) fn new(policy: RequestFencing) -> Self {
        Self {
            policy,
            generations: DashMap::new(),
        }
    }

    pub(crate) fn policy(&self) -> RequestFencing {
        self.policy
    }

    /// Issue the next ticket on `channel`, superseding earlier ones.
    pub(crate) fn issue(&self, channel: &'static str) -> Ticket {
        let mut generation = self.generations.entry(channel).or_insert(0);
        *generation += 1;
        Ticket {
            channel,
            generation: *generation,
        }
    }

    /// Whether a response carrying `ticket` may commit.
    pub(crate) fn admits(&self, ticket: Ticket) -> bool {
        match self.policy {
            RequestFencing::Disabled => true,
            RequestFencing::LatestIssued => self
                .generations
                .get(ticket.channel)
                .is_some_and(|current| *current == ticket.generation),
        }
    }
}
