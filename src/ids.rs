//! Identifier allocation shared by every entity of an export.

use log::trace;

/// Category tag embedded in base-id identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Canvas,
    Graph,
    Node,
    Edge,
    Menu,
    Callback,
    Message,
}

impl EntityKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::Graph => "graph",
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Menu => "menu",
            Self::Callback => "callback",
            Self::Message => "message",
        }
    }
}

/// Monotonic counter handing out unique string identifiers.
///
/// Without a base id every identifier is `F{n}`. With a base id the
/// identifier is `{base}_{tag}{n}`, except for the canvas which takes the
/// bare base id. Either way each call consumes exactly one ordinal, so no two
/// calls on the same allocator return the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    counter: u64,
    base_id: Option<String>,
}

impl IdAllocator {
    pub const DEFAULT_PREFIX: &'static str = "F";

    pub fn new() -> Self {
        Self::default()
    }

    /// The next identifier will carry ordinal `counter + 1`.
    pub fn starting_at(counter: u64) -> Self {
        Self {
            counter,
            base_id: None,
        }
    }

    pub fn with_base_id(mut self, base_id: impl Into<String>) -> Self {
        self.set_base_id(Some(base_id.into()));
        self
    }

    pub fn set_base_id(&mut self, base_id: Option<String>) {
        self.base_id = base_id.filter(|base| !base.is_empty());
    }

    pub fn base_id(&self) -> Option<&str> {
        self.base_id.as_deref()
    }

    /// Ordinal of the most recently allocated identifier.
    pub fn ordinal(&self) -> u64 {
        self.counter
    }

    pub fn next(&mut self, kind: EntityKind) -> String {
        self.counter += 1;
        let id = match (&self.base_id, kind) {
            (Some(base), EntityKind::Canvas) => base.clone(),
            (Some(base), _) => format!("{}_{}{}", base, kind.tag(), self.counter),
            (None, _) => format!("{}{}", Self::DEFAULT_PREFIX, self.counter),
        };
        trace!(kind = kind.tag(), ordinal = self.counter, id = id.as_str(); "Allocated identifier");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_ids_use_prefix() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next(EntityKind::Node), "F1");
        assert_eq!(ids.next(EntityKind::Edge), "F2");
        assert_eq!(ids.ordinal(), 2);
    }

    #[test]
    fn base_id_composes_tag_and_ordinal() {
        let mut ids = IdAllocator::starting_at(41).with_base_id("mycanvas");
        assert_eq!(ids.next(EntityKind::Menu), "mycanvas_menu42");
        assert_eq!(ids.next(EntityKind::Canvas), "mycanvas");
        assert_eq!(ids.next(EntityKind::Graph), "mycanvas_graph44");
    }

    #[test]
    fn empty_base_id_falls_back_to_prefix() {
        let mut ids = IdAllocator::new().with_base_id("");
        assert_eq!(ids.base_id(), None);
        assert_eq!(ids.next(EntityKind::Canvas), "F1");
    }

    #[test]
    fn never_repeats() {
        let mut ids = IdAllocator::new();
        let kinds = [EntityKind::Node, EntityKind::Menu, EntityKind::Callback];
        let seen: HashSet<String> = (0..300).map(|i| ids.next(kinds[i % 3])).collect();
        assert_eq!(seen.len(), 300);
    }
}
