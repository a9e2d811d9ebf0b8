//! Arena slot: tree links plus the node-kind payload.

use ss_core::EntityId;

use crate::{Consumer, Producer, Scheduler};

/// Payload of an arena slot.  Closed set: every node is one of these.
pub enum EntityKind {
    Producer(Producer),
    Scheduler(Scheduler),
    Consumer(Consumer),
}

/// Fieldless mirror of [`EntityKind`] for cheap matching.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    Producer,
    Scheduler,
    Consumer,
}

impl NodeKind {
    /// Schedulers and consumers can be submitted tasks; producers cannot.
    #[inline]
    pub fn accepts_tasks(self) -> bool {
        !matches!(self, NodeKind::Producer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Producer  => "producer",
            NodeKind::Scheduler => "scheduler",
            NodeKind::Consumer  => "consumer",
        }
    }
}

/// One node of the entity tree.
///
/// `parent` is a lookup-only back-reference; the arena owns every node, and
/// the tree shape lives entirely in `children` handle lists.
pub struct Entity {
    pub(crate) name:     String,
    pub(crate) parent:   Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) kind:     EntityKind,
}

impl Entity {
    pub(crate) fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self { name: name.into(), parent: None, children: Vec::new(), kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn node_kind(&self) -> NodeKind {
        match self.kind {
            EntityKind::Producer(_)  => NodeKind::Producer,
            EntityKind::Scheduler(_) => NodeKind::Scheduler,
            EntityKind::Consumer(_)  => NodeKind::Consumer,
        }
    }

    pub fn as_producer(&self) -> Option<&Producer> {
        match &self.kind {
            EntityKind::Producer(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_scheduler(&self) -> Option<&Scheduler> {
        match &self.kind {
            EntityKind::Scheduler(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_consumer(&self) -> Option<&Consumer> {
        match &self.kind {
            EntityKind::Consumer(c) => Some(c),
            _ => None,
        }
    }
}
