//! Validating constructor for [`Sim`].

use ss_core::{Diagnostics, SimClock, SimConfig, SimRng, TaskIdSource};

use crate::{EntityTree, NodeKind, Sim, SimError, SimResult};

/// Builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total steps, seed, output interval
/// - [`EntityTree`] — the fully wired producers, schedulers and consumers
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, tree).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    tree:   EntityTree,
}

impl SimBuilder {
    pub fn new(config: SimConfig, tree: EntityTree) -> Self {
        Self { config, tree }
    }

    /// Validate and build the [`Sim`].
    ///
    /// # Errors
    ///
    /// `SimError::Core` if the config is invalid (zero `total_steps`), or
    /// `SimError::Config` if a producer has no child to submit to.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        for (id, entity) in self.tree.iter() {
            if entity.node_kind() == NodeKind::Producer && entity.children().is_empty() {
                return Err(SimError::Config(format!(
                    "producer {id} ({:?}) has no child to submit tasks to",
                    entity.name()
                )));
            }
        }

        tracing::debug!(
            entities = self.tree.len(),
            roots = self.tree.roots().len(),
            total_steps = self.config.total_steps,
            seed = self.config.seed,
            "sim built"
        );

        Ok(Sim {
            rng:         SimRng::new(self.config.seed),
            clock:       SimClock::new(),
            ids:         TaskIdSource::new(),
            diagnostics: Diagnostics::new(),
            tree:        self.tree,
            config:      self.config,
        })
    }
}
