use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::ProducerConfig;
use crate::entity::Feature;
use crate::listener::{ListenerId, Listeners};
use crate::log::debug;
use crate::producer::{ProducibleEvent, ProducibleModel, ProducibleRef};

/// Queue-level production events, each carrying the request involved.
#[derive(Clone)]
pub enum ProducerEvent {
    /// A request passed its check and production began.
    Started(ProducibleRef),
    /// One tick of progress was applied to the current request.
    Producing(ProducibleRef),
    /// The current request reached its required steps.
    Produced(ProducibleRef),
    /// The current request is blocked by the checker. Fired every tick it
    /// stays blocked; the request is held, not dropped.
    CannotProduce(ProducibleRef),
}

/// Decides whether production of a request may begin. Checked every tick
/// while a request waits, so a temporary refusal only delays it.
///
/// Any `Fn(&ProducibleRef) -> bool` closure is a checker.
pub trait ProducerChecker {
    fn can_produce(&self, producible: &ProducibleRef) -> bool;
}

impl<F: Fn(&ProducibleRef) -> bool> ProducerChecker for F {
    fn can_produce(&self, producible: &ProducibleRef) -> bool {
        self(producible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Check,
    Producing,
}

/// FIFO production feature.
///
/// Requests are worked one at a time; the queue holds only the waiting ones.
/// A request entering work is checked first, and on the tick the check
/// passes production starts immediately, so a one-step request at high speed
/// completes the same tick it starts.
pub struct ProducerModel {
    state: State,
    current: Option<ProducibleRef>,
    queue: VecDeque<ProducibleRef>,
    progress: f64,
    steps_per_second: f64,
    checker: Option<Rc<dyn ProducerChecker>>,
    listeners: Listeners<ProducerEvent>,
}

impl ProducerModel {
    /// Creates an idle producer. Without a checker every request is allowed.
    ///
    /// # Panics
    ///
    /// Panics if the configured speed is not finite and positive.
    #[must_use]
    pub fn new(config: &ProducerConfig) -> ProducerModel {
        assert!(
            config.steps_per_second.is_finite() && config.steps_per_second > 0.0,
            "invalid production speed"
        );
        ProducerModel {
            state: State::None,
            current: None,
            queue: VecDeque::new(),
            progress: 0.0,
            steps_per_second: config.steps_per_second,
            checker: None,
            listeners: Listeners::new(),
        }
    }

    pub fn set_checker(&mut self, checker: Rc<dyn ProducerChecker>) {
        self.checker = Some(checker);
    }

    /// # Panics
    ///
    /// Panics if `steps_per_second` is not finite and positive.
    pub fn set_steps_per_second(&mut self, steps_per_second: f64) {
        assert!(
            steps_per_second.is_finite() && steps_per_second > 0.0,
            "invalid production speed"
        );
        self.steps_per_second = steps_per_second;
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&ProducerEvent) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Enqueues a request. An idle producer takes it up directly (it becomes
    /// the current request, checked on the next tick); otherwise it waits in
    /// the queue.
    pub fn add_to_production_queue(&mut self, producible: ProducibleRef) {
        if self.current.is_none() {
            self.current = Some(producible);
            self.state = State::Check;
        } else {
            self.queue.push_back(producible);
        }
    }

    /// Abandons the current request and moves on to the next one. No
    /// `Produced` event is fired for the abandoned request.
    pub fn skip_production(&mut self) {
        if self.current.is_some() {
            debug!("production skipped");
            self.advance();
        }
    }

    /// Abandons the current request and empties the queue.
    pub fn stop_production(&mut self) {
        self.current = None;
        self.queue.clear();
        self.progress = 0.0;
        self.state = State::None;
    }

    /// Number of requests waiting behind the current one.
    #[must_use]
    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    /// The waiting requests, front (next up) first.
    pub fn queued(&self) -> impl Iterator<Item = &ProducibleRef> {
        self.queue.iter()
    }

    #[must_use]
    pub fn is_producing(&self) -> bool {
        self.state == State::Producing
    }

    /// Accumulated steps of the current request, or `-1.0` when idle.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.current.is_none() {
            return -1.0;
        }
        self.progress
    }

    /// Whole-percent progress of the current request: `-1` when idle, `0`
    /// while the request is still in check.
    #[must_use]
    pub fn progress_percent(&self) -> i32 {
        let Some(current) = &self.current else {
            return -1;
        };
        if self.state != State::Producing {
            return 0;
        }
        percent(self.progress, f64::from(current.borrow().steps()))
    }

    fn action_check(&mut self) {
        let Some(current) = self.current.clone() else {
            self.state = State::None;
            return;
        };
        let allowed = self
            .checker
            .as_ref()
            .map_or(true, |checker| checker.can_produce(&current));
        if allowed {
            self.state = State::Producing;
            self.progress = 0.0;
            ProducibleModel::notify(&current, &ProducibleEvent::Started);
            self.listeners.notify(&ProducerEvent::Started(current));
        } else {
            self.listeners.notify(&ProducerEvent::CannotProduce(current));
        }
    }

    fn action_producing(&mut self, dt: f64) {
        let Some(current) = self.current.clone() else {
            self.state = State::None;
            return;
        };
        let steps = f64::from(current.borrow().steps());
        self.progress += self.steps_per_second * dt;
        let done = self.progress >= steps;
        if done {
            self.progress = steps;
        }

        let progress = percent(self.progress, steps);
        ProducibleModel::notify(&current, &ProducibleEvent::Progress(progress));
        self.listeners.notify(&ProducerEvent::Producing(current.clone()));

        if done {
            ProducibleModel::notify(&current, &ProducibleEvent::Ended);
            self.listeners.notify(&ProducerEvent::Produced(current));
            self.advance();
        }
    }

    /// Takes up the next waiting request, back through the check state.
    fn advance(&mut self) {
        self.progress = 0.0;
        self.current = self.queue.pop_front();
        self.state = if self.current.is_some() {
            State::Check
        } else {
            State::None
        };
    }
}

impl Feature for ProducerModel {
    fn update(&mut self, dt: f64) {
        if self.state == State::Check {
            self.action_check();
        }
        if self.state == State::Producing {
            self.action_producing(dt);
        }
    }
}

fn percent(progress: f64, steps: f64) -> i32 {
    (progress * 100.0 / steps).floor().clamp(0.0, 100.0) as i32
}
