//! Status buckets and per-snapshot tallies.

use std::fmt;

use crate::Ticket;

/// The four situation buckets the dashboard reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    /// Open tickets (situation 1).
    Open,
    /// Tickets not yet linked to an agent (situation 0).
    Unlinked,
    /// Last answered by a support agent (situation 2).
    AnsweredByAgent,
    /// Last answered by the customer (situation 3).
    AnsweredByCustomer,
}

impl StatusCategory {
    /// Display order, left to right.
    pub const ALL: [StatusCategory; 4] = [
        StatusCategory::Open,
        StatusCategory::Unlinked,
        StatusCategory::AnsweredByAgent,
        StatusCategory::AnsweredByCustomer,
    ];

    #[must_use]
    pub const fn from_situation_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Self::Unlinked),
            1 => Some(Self::Open),
            2 => Some(Self::AnsweredByAgent),
            3 => Some(Self::AnsweredByCustomer),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Unlinked => "Unlinked",
            Self::AnsweredByAgent => "Answered by agent",
            Self::AnsweredByCustomer => "Answered by customer",
        }
    }

    /// Position in [`StatusCategory::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Open => 0,
            Self::Unlinked => 1,
            Self::AnsweredByAgent => 2,
            Self::AnsweredByCustomer => 3,
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ticket count per [`StatusCategory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts([usize; 4]);

impl CategoryCounts {
    #[must_use]
    pub fn tally(tickets: &[Ticket]) -> Self {
        let mut counts = [0usize; 4];
        for category in tickets.iter().filter_map(Ticket::category) {
            counts[category.index()] += 1;
        }
        Self(counts)
    }

    #[must_use]
    pub const fn get(&self, category: StatusCategory) -> usize {
        self.0[category.index()]
    }

    /// Categories whose count strictly increased relative to `previous`.
    #[must_use]
    pub fn grown_since(&self, previous: &CategoryCounts) -> Vec<StatusCategory> {
        StatusCategory::ALL
            .into_iter()
            .filter(|&c| self.get(c) > previous.get(c))
            .collect()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// One fetched snapshot of the ticket queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    tickets: Vec<Ticket>,
    counts: CategoryCounts,
    open: Vec<usize>,
}

impl Board {
    #[must_use]
    pub fn from_tickets(tickets: Vec<Ticket>) -> Self {
        let counts = CategoryCounts::tally(&tickets);
        let open = tickets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.category() == Some(StatusCategory::Open))
            .map(|(i, _)| i)
            .collect();
        Self {
            tickets,
            counts,
            open,
        }
    }

    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    #[must_use]
    pub fn counts(&self) -> CategoryCounts {
        self.counts
    }

    /// Open tickets in API order.
    pub fn open_tickets(&self) -> impl ExactSizeIterator<Item = &Ticket> + Clone + '_ {
        self.open.iter().map(|&i| &self.tickets[i])
    }

    #[must_use]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }
}
