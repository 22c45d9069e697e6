//! Marker identifier generation.

use uuid::Uuid;

use crate::model::MarkerId;

/// Source of fresh marker identifiers.
pub trait IdGenerator {
    /// Produce the next identifier.
    fn next_id(&mut self) -> MarkerId;

    /// Record an identifier that exists elsewhere so it is never produced.
    fn observe(&mut self, _id: &MarkerId) {}
}

/// Random UUID v4 identifiers. The default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> MarkerId {
        MarkerId::new(Uuid::new_v4().to_string())
    }
}

/// Counting identifiers (`marker-1`, `marker-2`, …).
///
/// Deterministic, which is handy for tests and scripted hosts. The counter
/// only moves forward: observed ids with the same prefix push it past their
/// number, so an id is not handed out again after its marker is deleted.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("marker")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> MarkerId {
        let id = MarkerId::new(format!("{}-{}", self.prefix, self.next));
        self.next = self.next.saturating_add(1);
        id
    }

    fn observe(&mut self, id: &MarkerId) {
        let number = id
            .as_str()
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u64>().ok());
        if let Some(n) = number {
            self.next = self.next.max(n.saturating_add(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_are_unique() {
        let mut ids = UuidGenerator;
        let generated: HashSet<MarkerId> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 1000);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new("m");
        assert_eq!(ids.next_id().as_str(), "m-1");
        assert_eq!(ids.next_id().as_str(), "m-2");
        assert_eq!(SequentialIds::default().next_id().as_str(), "marker-1");
    }

    #[test]
    fn test_sequential_ids_skip_observed() {
        let mut ids = SequentialIds::new("m");
        ids.observe(&MarkerId::new("m-7"));
        ids.observe(&MarkerId::new("m-3"));
        ids.observe(&MarkerId::new("other-50"));
        ids.observe(&MarkerId::new("m-x"));
        assert_eq!(ids.next_id().as_str(), "m-8");
        assert_eq!(ids.next_id().as_str(), "m-9");
    }
}
