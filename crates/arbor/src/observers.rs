use std::{fmt, sync::Arc};

use crate::{canvas::Canvas, id::NodeId};

/// A handler registered on a node event, invoked with the canvas and the
/// node the event fired on.
pub type Observer = Arc<dyn Fn(&mut Canvas, NodeId) + Send + Sync>;

/// Handle identifying a registered observer for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// An ordered list of event observers.
///
/// Handlers run in registration order. Dispatch works on a snapshot of the
/// list, so a handler may register or remove observers (including itself)
/// without affecting the in-flight invocation.
#[derive(Default)]
pub struct Observers {
    next: u64,
    handlers: Vec<(ObserverId, Observer)>,
}

impl Observers {
    /// Register a handler, returning a handle that can remove it later.
    pub fn register(
        &mut self,
        handler: impl Fn(&mut Canvas, NodeId) + Send + Sync + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next);
        self.next += 1;
        self.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(oid, _)| *oid != id);
        self.handlers.len() != before
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Is the list empty?
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Clone out the handler list for dispatch.
    pub(crate) fn snapshot(&self) -> Vec<Observer> {
        self.handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_remove() {
        let mut obs = Observers::default();
        let a = obs.register(|_, _| {});
        let b = obs.register(|_, _| {});
        assert_eq!(obs.len(), 2);
        assert!(obs.remove(a));
        assert!(!obs.remove(a));
        assert_eq!(obs.len(), 1);
        assert!(obs.remove(b));
        assert!(obs.is_empty());
    }

    #[test]
    fn snapshot_isolated_from_mutation() {
        let mut obs = Observers::default();
        obs.register(|_, _| {});
        let snap = obs.snapshot();
        obs.register(|_, _| {});
        assert_eq!(snap.len(), 1);
        assert_eq!(obs.len(), 2);
    }
}
