use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy_ecs::resource::Resource;

use crate::engine::{ContestConfig, Directory};
use crate::model::{ActionResult, ContestAction};

/// Contest tuning, as loaded.
#[derive(Resource, Debug, Clone, Default)]
pub struct ContestSettings(pub ContestConfig);

/// Handle to the faction and territory directory.
#[derive(Resource, Clone)]
pub struct Directories(pub Arc<dyn Directory>);

/// Actions submitted from outside the tick path, drained at the start of
/// every tick.
///
/// Cloning shares the queue, so the event layer can hold a handle on any
/// thread while the runtime owns the app.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionInbox(Arc<Mutex<Vec<ContestAction>>>);

impl ActionInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&self, action: ContestAction) {
        self.queue().push(action);
    }

    /// Take every queued action in submission order.
    pub fn drain(&self) -> Vec<ContestAction> {
        std::mem::take(&mut *self.queue())
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }

    fn queue(&self) -> MutexGuard<'_, Vec<ContestAction>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Results of the actions drained this tick, oldest first. Cleared at the
/// start of every tick, so read them before ticking again.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionResults(pub Vec<ActionResult>);
