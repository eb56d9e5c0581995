//! Active-section state machine.
//!
//! Consumes visibility batches and keeps exactly one "current" region. Within a
//! batch the intersecting region with the lowest document order wins, whatever
//! order the events arrived in. A batch with no intersecting events leaves the
//! state untouched, so a fast scroll past a short section never blanks the nav.

use vt_observer::VisibilityEvent;
use vt_registry::RegionRegistry;

/// Which region, if any, is current.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveState {
    #[default]
    NoneActive,
    Active(String),
}

impl ActiveState {
    pub fn active_region_id(&self) -> Option<&str> {
        match self {
            Self::NoneActive => None,
            Self::Active(id) => Some(id.as_str()),
        }
    }

    pub fn is_active(&self, region_id: &str) -> bool {
        self.active_region_id() == Some(region_id)
    }
}

/// Outcome of feeding input to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Activated(String),
    Unchanged,
}

/// Owns the [`ActiveState`] for one page instance.
#[derive(Debug, Clone)]
pub struct ActiveSectionTracker {
    registry: RegionRegistry,
    state: ActiveState,
}

impl ActiveSectionTracker {
    pub fn new(registry: RegionRegistry) -> Self {
        Self {
            registry,
            state: ActiveState::NoneActive,
        }
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn state(&self) -> &ActiveState {
        &self.state
    }

    pub fn active_region_id(&self) -> Option<&str> {
        self.state.active_region_id()
    }

    /// Applies the events of one observation callback.
    pub fn apply_batch(&mut self, batch: &[VisibilityEvent]) -> Transition {
        let mut winner: Option<(usize, &str)> = None;

        for event in batch.iter().filter(|event| event.is_intersecting) {
            let Some(order) = self.registry.order_of(&event.region_id) else {
                tracing::trace!(region_id = %event.region_id, "stale visibility event ignored");
                continue;
            };

            if winner.is_none_or(|(best, _)| order < best) {
                winner = Some((order, event.region_id.as_str()));
            }
        }

        match winner {
            Some((_, region_id)) => {
                let region_id = region_id.to_owned();
                self.transition_to(region_id)
            }
            None => Transition::Unchanged,
        }
    }

    /// Forces `region_id` current, e.g. after jumping to a fragment anchor.
    /// Unknown ids are ignored.
    pub fn activate(&mut self, region_id: &str) -> Transition {
        if !self.registry.contains(region_id) {
            tracing::trace!(region_id, "activation of unknown region ignored");
            return Transition::Unchanged;
        }
        self.transition_to(region_id.to_owned())
    }

    /// Swaps in a new registry and returns to `NoneActive`.
    pub fn reconfigure(&mut self, registry: RegionRegistry) {
        self.registry = registry;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.state = ActiveState::NoneActive;
    }

    fn transition_to(&mut self, region_id: String) -> Transition {
        if self.state.is_active(&region_id) {
            return Transition::Unchanged;
        }
        tracing::debug!(region_id = %region_id, "active region changed");
        self.state = ActiveState::Active(region_id.clone());
        Transition::Activated(region_id)
    }
}
