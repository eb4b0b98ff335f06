use std::sync::atomic::{AtomicU64, Ordering};

/// Proof of which selection a request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    pub pool: String,
    generation: u64,
}

/// Tracks the pool the user currently has selected.
///
/// Every [`SelectionGuard::select`] invalidates earlier tickets, so a
/// response arriving after the user moved on can be recognised and dropped.
#[derive(Debug, Default)]
pub struct SelectionGuard {
    generation: AtomicU64,
}

impl SelectionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, pool: impl Into<String>) -> SelectionTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SelectionTicket {
            pool: pool.into(),
            generation,
        }
    }

    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let guard = SelectionGuard::new();
        let first = guard.select("CPOOL1");
        assert!(guard.is_current(&first));

        let second = guard.select("CPOOL2");
        assert!(!guard.is_current(&first));
        assert!(guard.is_current(&second));

        // reselecting the same pool still retires the older ticket
        let third = guard.select("CPOOL2");
        assert!(!guard.is_current(&second));
        assert!(guard.is_current(&third));
    }
}
