use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::engine::lifecycle::TransitionKind;

#[derive(Debug, Default)]
pub struct InFlight {
    orders: DashMap<String, TransitionKind>,
}

impl InFlight {
    pub fn claim(&self, order_id: &str, kind: TransitionKind) -> Result<InFlightGuard<'_>, TransitionKind> {
        match self.orders.entry(order_id.to_string()) {
            Entry::Occupied(running) => Err(*running.get()),
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Ok(InFlightGuard {
                    registry: self,
                    order_id: order_id.to_string(),
                })
            }
        }
    }

    pub fn running(&self, order_id: &str) -> Option<TransitionKind> {
        self.orders.get(order_id).map(|entry| *entry.value())
    }
}

/// Releases the claim when the transition call finishes, however it ends.
pub struct InFlightGuard<'a> {
    registry: &'a InFlight,
    order_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.orders.remove(&self.order_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_on_same_order_is_refused() {
        let registry = InFlight::default();

        let guard = registry.claim("o1", TransitionKind::Confirm).unwrap();
        assert_eq!(
            registry.claim("o1", TransitionKind::Cancel).err(),
            Some(TransitionKind::Confirm)
        );
        assert!(registry.claim("o2", TransitionKind::Cancel).is_ok());

        drop(guard);
        assert_eq!(registry.running("o1"), None);
        assert!(registry.claim("o1", TransitionKind::Cancel).is_ok());
    }
}
