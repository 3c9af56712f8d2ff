use crate::prelude::*;

/// An order issued by an actor entity. For this crate the actor is whatever
/// entity the surrounding game uses to drive a board (see
/// [`InBoard`](crate::board::InBoard)).
#[derive(Clone, Debug, Component)]
pub struct Op<O> {
    source: Entity,
    op: O,
}

impl<O> Op<O> {
    pub fn new(source: Entity, op: O) -> Self {
        Op { source, op }
    }

    pub fn op(&self) -> &O {
        &self.op
    }

    pub fn source(&self) -> Entity {
        self.source
    }
}

impl<O: Send + Sync + 'static> Event for Op<O> {}

pub trait OpSubtype: Clone {
    type Error: Clone + std::fmt::Debug + Send + Sync + 'static;

    fn for_source(self, source: Entity) -> Op<Self> {
        Op::new(source, self)
    }
}

/// Outcome of a processed [`Op`], mirrored back to observers as an event.
/// Successful ops describe what they did through [`Metadata`].
#[derive(Clone, Debug, Component, getset::Getters)]
pub struct OpResult<O: OpSubtype> {
    #[getset(get = "pub")]
    source: Op<O>,
    #[getset(get = "pub")]
    result: Result<Metadata, O::Error>,
}

impl<O: OpSubtype> OpResult<O> {
    pub fn new(source: &Op<O>, result: Result<Metadata, O::Error>) -> Self {
        OpResult {
            source: source.clone(),
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.result.as_ref().ok()
    }
}

impl<O: OpSubtype + Send + Sync + 'static> Event for OpResult<O> {}
