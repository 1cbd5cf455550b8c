use std::rc::{Rc, Weak};

use crate::config::ProducibleConfig;
use crate::entity::{Entity, Feature, FeatureRef};
use crate::error::TickworkError;
use crate::listener::{ListenerId, Listeners};
use crate::services::Services;

/// Shared handle to a production request's describing feature.
pub type ProducibleRef = FeatureRef<ProducibleModel>;

/// Lifecycle of a single production request, as seen from the request side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducibleEvent {
    /// Production of this request has begun.
    Started,
    /// Progress, in whole percent of the required steps.
    Progress(i32),
    /// The required steps have been reached.
    Ended,
}

/// Data feature describing a production request: the steps of work it needs
/// and the size of the result, plus listeners for its lifecycle.
pub struct ProducibleModel {
    steps: u32,
    width: u32,
    height: u32,
    owner: Weak<Entity>,
    listeners: Listeners<ProducibleEvent>,
}

impl ProducibleModel {
    /// # Panics
    ///
    /// Panics if the config names zero steps or a zero-sized result.
    #[must_use]
    pub fn new(config: &ProducibleConfig) -> ProducibleModel {
        assert!(
            config.steps > 0 && config.width > 0 && config.height > 0,
            "invalid producible settings"
        );
        ProducibleModel {
            steps: config.steps,
            width: config.width,
            height: config.height,
            owner: Weak::new(),
            listeners: Listeners::new(),
        }
    }

    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The entity this request is attached to, while it is still alive.
    #[must_use]
    pub fn owner(&self) -> Option<Rc<Entity>> {
        self.owner.upgrade()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&ProducibleEvent) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Runs the registered listeners with no borrow of the model held, so a
    /// listener may query its own request through a shared handle.
    pub(crate) fn notify(producible: &ProducibleRef, event: &ProducibleEvent) {
        let mut listeners = std::mem::take(&mut producible.borrow_mut().listeners);
        listeners.notify(event);
        producible.borrow_mut().listeners = listeners;
    }
}

impl Feature for ProducibleModel {
    fn prepare(&mut self, owner: &Rc<Entity>, _services: &Services) -> Result<(), TickworkError> {
        self.owner = Rc::downgrade(owner);
        Ok(())
    }
}
