/*!

Queued production.

A `ProducerModel` works through a FIFO queue of production requests. Each
request is an entity carrying a [`ProducibleModel`] describing the steps of
work it needs and its size. Production of one request goes through a check
state (where a [`ProducerChecker`] can hold it back) and a producing state
that accumulates progress every tick until the required steps are reached.

Both sides observe the process: the producer's own listeners see queue-level
events ([`ProducerEvent`]), while each producible's listeners see the
lifecycle of that one request ([`ProducibleEvent`]).

*/

mod producer;
mod producible;

pub use producer::{ProducerChecker, ProducerEvent, ProducerModel};
pub use producible::{ProducibleEvent, ProducibleModel, ProducibleRef};
