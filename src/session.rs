use tracing::warn;

/// Identifies one hashing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Hands out tickets and tells whether a ticket is still the latest one.
///
/// Runs are never interrupted; when a new file is picked the old run keeps
/// going and its result is discarded on arrival.
#[derive(Debug, Default)]
pub struct Epochs {
    latest: u64,
    retired: bool,
}

impl Epochs {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        self.retired = false;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.retired && ticket.0 == self.latest
    }

    /// Keep `value` only if it belongs to the latest ticket.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            warn!(ticket = ticket.0, latest = self.latest, "dropping stale result");
            None
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<Ticket> {
        (self.latest > 0 && !self.retired).then_some(Ticket(self.latest))
    }

    /// Stop accepting results for the current ticket.
    pub fn invalidate(&mut self) {
        self.retired = true;
    }
}
