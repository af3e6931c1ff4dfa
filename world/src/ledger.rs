//! Build-resource accounting for the placement workflow.

/// Tracks the available build-resource balance.
///
/// The balance is `starting_stock + collected - spent`, where `collected`
/// mirrors the world's collected-resource-tile count and `spent`
/// accumulates the cost of every committed placement. Only the world may
/// mutate the counters; external observers read through accessors.
#[derive(Clone, Copy, Debug)]
pub struct ResourceLedger {
    starting_stock: u32,
    collected: u32,
    spent: u32,
}

impl ResourceLedger {
    /// Creates a ledger seeded with the configured starting stock.
    #[must_use]
    pub const fn new(starting_stock: u32) -> Self {
        Self {
            starting_stock,
            collected: 0,
            spent: 0,
        }
    }

    /// Build resources currently available for placement.
    #[must_use]
    pub fn available(&self) -> u32 {
        self.starting_stock
            .saturating_add(self.collected)
            .saturating_sub(self.spent)
    }

    /// Reports whether the balance covers the provided cost.
    #[must_use]
    pub fn can_afford(&self, cost: u32) -> bool {
        self.available() >= cost
    }

    /// Total resource tiles collected so far.
    #[must_use]
    pub const fn collected(&self) -> u32 {
        self.collected
    }

    /// Debits a committed placement.
    ///
    /// Precondition: the caller has checked [`can_afford`](Self::can_afford).
    /// Debiting beyond availability is a programming error, not a
    /// recoverable runtime condition.
    pub(crate) fn debit(&mut self, cost: u32) {
        debug_assert!(
            self.can_afford(cost),
            "debit of {cost} exceeds available balance {}",
            self.available()
        );
        self.spent = self.spent.saturating_add(cost);
    }

    /// Updates the mirrored collected-resource total.
    ///
    /// The collected set is monotonic, so the total never decreases.
    pub(crate) fn set_collected(&mut self, total: u32) {
        debug_assert!(
            total >= self.collected,
            "collected total must be monotonic ({} -> {total})",
            self.collected
        );
        self.collected = total;
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceLedger;

    #[test]
    fn available_combines_stock_collection_and_spending() {
        let mut ledger = ResourceLedger::new(4);
        assert_eq!(ledger.available(), 4);

        ledger.set_collected(3);
        assert_eq!(ledger.available(), 7);

        ledger.debit(2);
        assert_eq!(ledger.available(), 5);
        assert_eq!(ledger.collected(), 3);
    }

    #[test]
    fn affordability_is_inclusive_of_the_exact_balance() {
        let ledger = ResourceLedger::new(2);
        assert!(ledger.can_afford(2));
        assert!(!ledger.can_afford(3));
        assert!(ledger.can_afford(0));
    }

    #[test]
    fn repeated_debits_accumulate() {
        let mut ledger = ResourceLedger::new(10);
        ledger.debit(3);
        ledger.debit(4);
        assert_eq!(ledger.available(), 3);
    }
}
