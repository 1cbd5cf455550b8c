/*!

Resource extraction.

An `ExtractorModel` cycles a worker through go-to-resources, extraction,
carry and drop-off phases. The travel phases are gated by an
[`ExtractorChecker`] supplied by the entity's movement logic (the extractor
itself has no notion of pathfinding, only of arrival). Extraction optionally
debits a finite [`ExtractableModel`] node on another entity; without one the
target is treated as inexhaustible.

Quantities reported by [`ExtractorEvent::Extracted`] are cumulative for the
current load, and a completed drop-off restarts the cycle automatically.

*/

mod extractable;
mod extractor;

pub use extractable::ExtractableModel;
pub use extractor::{ExtractorChecker, ExtractorEvent, ExtractorModel, ResourceLocation};
