use ss_core::{EntityId, SsError};
use ss_policy::PolicyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("adding {child} under {parent} would create a cycle")]
    Cycle { parent: EntityId, child: EntityId },

    #[error("{0} is a consumer and cannot have children")]
    LeafParent(EntityId),

    #[error("{0} cannot accept tasks")]
    NotTaskAccepting(EntityId),

    #[error("{0} is not a producer")]
    NotAProducer(EntityId),

    #[error("bad task completion: {submitted} tasks submitted but {completed} completed")]
    BadTaskCompletion { submitted: u64, completed: u64 },

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Core(#[from] SsError),
}

pub type SimResult<T> = Result<T, SimError>;
