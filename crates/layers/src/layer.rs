use scene::ProjectionViewState;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Something drawn from the current view state.
pub trait Layer {
    type Snapshot;

    fn id(&self) -> LayerId;

    /// Render against the committed view; called after every committed step.
    fn extract(&self, view: &ProjectionViewState) -> Self::Snapshot;
}
