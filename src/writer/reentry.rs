use std::cell::Cell;

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as being inside the writer.
///
/// The writer is usually the output of the subscriber that receives its own
/// diagnostics. Anything it logs while forwarding can come straight back as a
/// nested write on the same thread, possibly while the transport connection
/// is locked. Such nested writes are dropped.
pub(crate) struct ForwardGuard(());

impl ForwardGuard {
    /// Returns `None` when this thread is already forwarding.
    pub(crate) fn enter() -> Option<Self> {
        if FORWARDING.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(ForwardGuard(()))
        }
    }
}

impl Drop for ForwardGuard {
    fn drop(&mut self) {
        FORWARDING.with(|flag| flag.set(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_enter_is_refused() {
        let outer = ForwardGuard::enter();
        assert!(outer.is_some());
        assert!(ForwardGuard::enter().is_none());

        drop(outer);
        assert!(ForwardGuard::enter().is_some());
    }

    #[test]
    fn test_guard_is_per_thread() {
        let _outer = ForwardGuard::enter().unwrap();

        let other = std::thread::spawn(|| ForwardGuard::enter().is_some())
            .join()
            .unwrap();
        assert!(other);
    }
}
