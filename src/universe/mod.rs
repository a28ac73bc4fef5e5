mod catalog;
mod generate;
mod model;
mod store;

pub use catalog::{NOTE_PREFIXES, NOTE_SUFFIXES, PLACEHOLDER_PREVIEW, TOPICS, Topic};
pub use generate::{GeneratorConfig, clamp_note_count, generate_universe, sample_normal};
pub use model::{Cluster, ClusterRemoval, Note, SubCluster, Universe};
pub use store::{StoreEvent, UniverseStore};

#[cfg(test)]
pub(crate) use model::tests as model_fixtures;
