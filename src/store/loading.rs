use std::sync::atomic::{AtomicUsize, Ordering};

/// Holds the store's loading flag for the lifetime of one fetch. Counted so
/// overlapping fetches keep the flag set until the last one finishes.
pub(super) struct LoadingGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    pub(super) fn acquire(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(super) fn is_held(in_flight: &AtomicUsize) -> bool {
    in_flight.load(Ordering::SeqCst) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_guards_keep_flag_until_last_drop() {
        let counter = AtomicUsize::new(0);

        let first = LoadingGuard::acquire(&counter);
        let second = LoadingGuard::acquire(&counter);
        assert!(is_held(&counter));

        drop(first);
        assert!(is_held(&counter));

        drop(second);
        assert!(!is_held(&counter));
    }
}
