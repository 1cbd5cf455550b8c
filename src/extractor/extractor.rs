use std::rc::Rc;

use crate::config::ExtractorConfig;
use crate::entity::{Feature, FeatureRef};
use crate::extractor::ExtractableModel;
use crate::listener::{ListenerId, Listeners};
use crate::log::debug;

/// Where the current extraction target sits, in tile coordinates, and what
/// it yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub resource: String,
    pub tx: i32,
    pub ty: i32,
    pub width_in_tiles: u32,
    pub height_in_tiles: u32,
}

/// Phase transitions and progress of the extraction cycle. `Extracted`
/// carries the cumulative quantity of the current load, not a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorEvent {
    /// The worker set off towards the resource target.
    StartGoToResources(Option<ResourceLocation>),
    /// The worker arrived and extraction began.
    StartExtraction(Option<ResourceLocation>),
    /// The load grew to this cumulative quantity.
    Extracted(u32),
    /// The load is complete (or the node ran dry) and is being carried back.
    StartCarry(u32),
    /// The worker arrived at the warehouse and unloading began.
    StartDropOff(u32),
    /// The whole load was delivered.
    DroppedOff(u32),
}

/// Arrival gate for the travel phases, implemented by the entity's movement
/// logic. Both checks are polled every tick; the extractor only advances
/// once they confirm.
pub trait ExtractorChecker {
    /// Has the worker reached the resource target?
    fn can_extract(&self) -> bool;
    /// Has the worker reached the warehouse?
    fn can_carry(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    GotoResources,
    Extracting,
    GotoWarehouse,
    DropOff,
}

/// Extraction cycle feature.
///
/// Rates are per tick; the tick delta is ignored so the cycle advances in
/// whole simulation steps. On the tick an arrival check passes, the
/// corresponding work phase runs immediately.
pub struct ExtractorModel {
    state: State,
    extractable: Option<FeatureRef<ExtractableModel>>,
    resource_location: Option<ResourceLocation>,
    capacity: u32,
    extract_per_tick: f64,
    drop_off_per_tick: f64,
    count: f64,
    last_extracted: u32,
    checker: Option<Rc<dyn ExtractorChecker>>,
    listeners: Listeners<ExtractorEvent>,
}

impl ExtractorModel {
    /// # Panics
    ///
    /// Panics if the capacity is zero or either rate is not finite and
    /// positive.
    #[must_use]
    pub fn new(config: &ExtractorConfig) -> ExtractorModel {
        assert!(
            config.capacity > 0
                && config.extract_per_tick.is_finite()
                && config.extract_per_tick > 0.0
                && config.drop_off_per_tick.is_finite()
                && config.drop_off_per_tick > 0.0,
            "invalid extraction settings"
        );
        ExtractorModel {
            state: State::None,
            extractable: None,
            resource_location: None,
            capacity: config.capacity,
            extract_per_tick: config.extract_per_tick,
            drop_off_per_tick: config.drop_off_per_tick,
            count: 0.0,
            last_extracted: 0,
            checker: None,
            listeners: Listeners::new(),
        }
    }

    pub fn set_checker(&mut self, checker: Rc<dyn ExtractorChecker>) {
        self.checker = Some(checker);
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&ExtractorEvent) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Targets a finite resource node. The location is derived from the
    /// node, and extraction debits it.
    pub fn set_extractable(&mut self, node: FeatureRef<ExtractableModel>) {
        let location = {
            let node = node.borrow();
            ResourceLocation {
                resource: node.resource().to_string(),
                tx: node.tx(),
                ty: node.ty(),
                width_in_tiles: node.width_in_tiles(),
                height_in_tiles: node.height_in_tiles(),
            }
        };
        self.resource_location = Some(location);
        self.extractable = Some(node);
    }

    /// Targets a bare location with no backing node; the resource there is
    /// treated as inexhaustible.
    pub fn set_resource_location(&mut self, location: ResourceLocation) {
        self.extractable = None;
        self.resource_location = Some(location);
    }

    #[must_use]
    pub fn resource_location(&self) -> Option<&ResourceLocation> {
        self.resource_location.as_ref()
    }

    /// Cumulative quantity of the current load.
    #[must_use]
    pub fn extracted(&self) -> u32 {
        self.last_extracted
    }

    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[must_use]
    pub fn extract_per_tick(&self) -> f64 {
        self.extract_per_tick
    }

    #[must_use]
    pub fn drop_off_per_tick(&self) -> f64 {
        self.drop_off_per_tick
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn set_capacity(&mut self, capacity: u32) {
        assert!(capacity > 0, "invalid extraction settings");
        self.capacity = capacity;
    }

    /// # Panics
    ///
    /// Panics if the rate is not finite and positive.
    pub fn set_extract_per_tick(&mut self, rate: f64) {
        assert!(rate.is_finite() && rate > 0.0, "invalid extraction settings");
        self.extract_per_tick = rate;
    }

    /// # Panics
    ///
    /// Panics if the rate is not finite and positive.
    pub fn set_drop_off_per_tick(&mut self, rate: f64) {
        assert!(rate.is_finite() && rate > 0.0, "invalid extraction settings");
        self.drop_off_per_tick = rate;
    }

    #[must_use]
    pub fn is_extracting(&self) -> bool {
        self.state == State::Extracting
    }

    /// Begins (or restarts) the cycle: the load is reset and the worker is
    /// sent towards the current target.
    pub fn start_extraction(&mut self) {
        self.state = State::GotoResources;
        self.count = 0.0;
        self.last_extracted = 0;
        self.listeners
            .notify(&ExtractorEvent::StartGoToResources(
                self.resource_location.clone(),
            ));
    }

    /// Aborts the cycle and forgets the target.
    pub fn stop_extraction(&mut self) {
        self.state = State::None;
        self.extractable = None;
        self.resource_location = None;
        self.count = 0.0;
        self.last_extracted = 0;
    }

    fn action_goto_resources(&mut self) {
        if self.arrival(|checker| checker.can_extract()) {
            self.state = State::Extracting;
            self.listeners.notify(&ExtractorEvent::StartExtraction(
                self.resource_location.clone(),
            ));
        }
    }

    fn action_extracting(&mut self) {
        let mut rate = self.extract_per_tick;
        if let Some(node) = &self.extractable {
            let remaining = f64::from(node.borrow().quantity());
            if remaining <= 0.0 {
                // Node ran dry: carry what we have, or give up empty-handed.
                if self.last_extracted > 0 {
                    debug!("resource node exhausted, carrying partial load");
                    self.state = State::GotoWarehouse;
                    self.listeners
                        .notify(&ExtractorEvent::StartCarry(self.last_extracted));
                } else {
                    self.stop_extraction();
                }
                return;
            }
            rate = rate.min(remaining);
        }

        self.count = (self.count + rate).min(f64::from(self.capacity));
        let reached = self.count.floor() as u32;
        if reached > self.last_extracted {
            let gained = reached - self.last_extracted;
            if let Some(node) = &self.extractable {
                node.borrow_mut().extract_resource(gained);
            }
            self.last_extracted = reached;
            self.listeners.notify(&ExtractorEvent::Extracted(reached));
        }
        if reached >= self.capacity {
            self.count = f64::from(self.capacity);
            self.state = State::GotoWarehouse;
            self.listeners
                .notify(&ExtractorEvent::StartCarry(self.last_extracted));
        }
    }

    fn action_goto_warehouse(&mut self) {
        if self.arrival(|checker| checker.can_carry()) {
            self.state = State::DropOff;
            self.listeners
                .notify(&ExtractorEvent::StartDropOff(self.last_extracted));
        }
    }

    fn action_dropping_off(&mut self) {
        self.count -= self.drop_off_per_tick;
        if self.count.floor() <= 0.0 {
            self.listeners
                .notify(&ExtractorEvent::DroppedOff(self.last_extracted));
            self.start_extraction();
        }
    }

    /// Without a checker no arrival is ever confirmed.
    fn arrival(&self, check: impl Fn(&dyn ExtractorChecker) -> bool) -> bool {
        self.checker
            .as_ref()
            .map_or(false, |checker| check(checker.as_ref()))
    }
}

impl Feature for ExtractorModel {
    fn update(&mut self, _dt: f64) {
        match self.state {
            State::None => {}
            State::GotoResources => {
                self.action_goto_resources();
                // Arrival confirmed: extract on the same tick.
                if self.state == State::Extracting {
                    self.action_extracting();
                }
            }
            State::Extracting => self.action_extracting(),
            State::GotoWarehouse => {
                self.action_goto_warehouse();
                if self.state == State::DropOff {
                    self.action_dropping_off();
                }
            }
            State::DropOff => self.action_dropping_off(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::entity::Entity;
    use crate::services::Services;

    struct AlwaysArrived;
    impl ExtractorChecker for AlwaysArrived {
        fn can_extract(&self) -> bool {
            true
        }
        fn can_carry(&self) -> bool {
            true
        }
    }

    struct NeverAtResources;
    impl ExtractorChecker for NeverAtResources {
        fn can_extract(&self) -> bool {
            false
        }
        fn can_carry(&self) -> bool {
            true
        }
    }

    fn gold_mine() -> ResourceLocation {
        ResourceLocation {
            resource: "gold".to_string(),
            tx: 4,
            ty: 2,
            width_in_tiles: 2,
            height_in_tiles: 2,
        }
    }

    fn extractor(capacity: u32, extract: f64, drop_off: f64) -> ExtractorModel {
        ExtractorModel::new(&ExtractorConfig {
            capacity,
            extract_per_tick: extract,
            drop_off_per_tick: drop_off,
        })
    }

    fn record(
        extractor: &mut ExtractorModel,
    ) -> Rc<RefCell<Vec<ExtractorEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let events_clone = events.clone();
        extractor.add_listener(move |event| events_clone.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn extraction_reports_cumulative_quantities() {
        let mut extractor = extractor(5, 1.0, 2.5);
        extractor.set_checker(Rc::new(AlwaysArrived));
        extractor.set_resource_location(gold_mine());
        let events = record(&mut extractor);

        extractor.start_extraction();
        for _ in 0..5 {
            extractor.update(1.0);
        }

        assert_eq!(
            *events.borrow(),
            vec![
                ExtractorEvent::StartGoToResources(Some(gold_mine())),
                ExtractorEvent::StartExtraction(Some(gold_mine())),
                ExtractorEvent::Extracted(1),
                ExtractorEvent::Extracted(2),
                ExtractorEvent::Extracted(3),
                ExtractorEvent::Extracted(4),
                ExtractorEvent::Extracted(5),
                ExtractorEvent::StartCarry(5),
            ]
        );
        assert_eq!(extractor.extracted(), 5);
        assert!(!extractor.is_extracting());
    }

    #[test]
    fn travel_blocks_until_arrival_is_confirmed() {
        let mut extractor = extractor(5, 1.0, 1.0);
        extractor.set_checker(Rc::new(NeverAtResources));
        extractor.set_resource_location(gold_mine());
        let events = record(&mut extractor);

        extractor.start_extraction();
        for _ in 0..3 {
            extractor.update(1.0);
        }

        assert_eq!(
            *events.borrow(),
            vec![ExtractorEvent::StartGoToResources(Some(gold_mine()))]
        );
        assert!(!extractor.is_extracting());
    }

    #[test]
    fn finite_node_is_debited_and_partial_load_carried() {
        let services = Services::new();
        let entity = Entity::new(&services);
        let node = entity
            .add_feature(&services, ExtractableModel::new("gold", 3))
            .unwrap();

        let mut extractor = extractor(5, 1.0, 1.0);
        extractor.set_checker(Rc::new(AlwaysArrived));
        extractor.set_extractable(node.clone());
        assert_eq!(extractor.resource_location().unwrap().resource, "gold");
        let events = record(&mut extractor);

        extractor.start_extraction();
        for _ in 0..5 {
            extractor.update(1.0);
        }

        let events = events.borrow();
        assert!(events.contains(&ExtractorEvent::Extracted(3)));
        assert!(events.contains(&ExtractorEvent::StartCarry(3)));
        assert!(!events.contains(&ExtractorEvent::Extracted(4)));
        assert_eq!(node.borrow().quantity(), 0);
    }

    #[test]
    fn drop_off_delivers_and_restarts_the_cycle() {
        let mut extractor = extractor(2, 1.0, 1.0);
        extractor.set_checker(Rc::new(AlwaysArrived));
        extractor.set_resource_location(gold_mine());
        let events = record(&mut extractor);

        extractor.start_extraction();
        for _ in 0..5 {
            extractor.update(1.0);
        }

        assert_eq!(
            *events.borrow(),
            vec![
                ExtractorEvent::StartGoToResources(Some(gold_mine())),
                ExtractorEvent::StartExtraction(Some(gold_mine())),
                ExtractorEvent::Extracted(1),
                ExtractorEvent::Extracted(2),
                ExtractorEvent::StartCarry(2),
                ExtractorEvent::StartDropOff(2),
                ExtractorEvent::DroppedOff(2),
                ExtractorEvent::StartGoToResources(Some(gold_mine())),
                ExtractorEvent::StartExtraction(Some(gold_mine())),
                ExtractorEvent::Extracted(1),
            ]
        );
    }

    #[test]
    fn stop_extraction_forgets_the_target() {
        let mut extractor = extractor(5, 1.0, 1.0);
        extractor.set_checker(Rc::new(AlwaysArrived));
        extractor.set_resource_location(gold_mine());

        extractor.start_extraction();
        extractor.update(1.0);
        assert!(extractor.is_extracting());

        extractor.stop_extraction();
        assert!(!extractor.is_extracting());
        assert!(extractor.resource_location().is_none());
        assert_eq!(extractor.extracted(), 0);

        // Inert until restarted with a new target.
        extractor.update(1.0);
        assert!(!extractor.is_extracting());
    }

    #[test]
    #[should_panic(expected = "invalid extraction settings")]
    fn zero_capacity_is_rejected() {
        let _ = extractor(0, 1.0, 1.0);
    }
}
