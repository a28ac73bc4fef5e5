use std::sync::mpsc::{Receiver, Sender, channel};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::error::{GalaxyError, Result};
use crate::proximity;
use crate::visibility::{SortOrder, VisibleData, get_visible_data};

use super::generate::{GeneratorConfig, clamp_note_count, generate_universe};
use super::model::{ClusterRemoval, Note, Universe};

/// Change notifications delivered to [`UniverseStore::subscribe`] receivers.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    Regenerated { notes: usize },
    ClusterDeleted(ClusterRemoval),
    /// Active clusters, sort order or the visible cap changed.
    FilterChanged,
    FocusChanged(Option<String>),
}

/// Owns the generated dataset and the view parameters derived from it.
///
/// All mutation goes through methods here; derived views come from the
/// pure functions in [`crate::visibility`] and [`crate::proximity`].
pub struct UniverseStore {
    universe: Universe,
    generator: GeneratorConfig,
    rng: StdRng,
    active_cluster_ids: Vec<String>,
    sort_order: SortOrder,
    max_visible_notes: usize,
    focused: Option<String>,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl UniverseStore {
    /// Starts empty; call [`Self::regenerate`] to populate.
    pub fn new(
        generator: GeneratorConfig,
        sort_order: SortOrder,
        max_visible_notes: usize,
    ) -> Self {
        let rng = match generator.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        Self {
            universe: Universe::default(),
            generator,
            rng,
            active_cluster_ids: Vec::new(),
            sort_order,
            max_visible_notes,
            focused: None,
            subscribers: Vec::new(),
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn generator_config(&self) -> &GeneratorConfig {
        &self.generator
    }

    pub fn active_cluster_ids(&self) -> &[String] {
        &self.active_cluster_ids
    }

    pub fn is_active(&self, cluster_id: &str) -> bool {
        self.active_cluster_ids.iter().any(|id| id == cluster_id)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn max_visible_notes(&self) -> usize {
        self.max_visible_notes
    }

    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Replaces the whole dataset with a fresh generation of `requested`
    /// notes. Every new cluster starts active and focus is cleared.
    pub fn regenerate(&mut self, requested: i64) -> usize {
        let count = clamp_note_count(requested);
        self.universe = generate_universe(count, &self.generator, &mut self.rng, Utc::now());
        self.active_cluster_ids = self
            .universe
            .clusters
            .iter()
            .map(|cluster| cluster.id.clone())
            .collect();
        let had_focus = self.focused.take().is_some();

        info!(
            notes = count,
            clusters = self.universe.clusters.len(),
            seed = ?self.generator.seed,
            "regenerated universe"
        );
        self.emit(StoreEvent::Regenerated { notes: count });
        if had_focus {
            self.emit(StoreEvent::FocusChanged(None));
        }
        count
    }

    /// Drops the cluster, its solar systems and its notes.
    pub fn delete_cluster(&mut self, cluster_id: &str) -> Result<ClusterRemoval> {
        let removal = self
            .universe
            .remove_cluster(cluster_id)
            .ok_or_else(|| GalaxyError::UnknownCluster(cluster_id.to_owned()))?;
        self.active_cluster_ids.retain(|id| id != cluster_id);

        info!(
            cluster = cluster_id,
            sub_clusters = removal.sub_clusters_removed,
            notes = removal.notes_removed,
            "deleted cluster"
        );

        let focus_lost = self
            .focused
            .as_deref()
            .is_some_and(|id| self.universe.note(id).is_none());
        if focus_lost {
            self.focused = None;
            self.emit(StoreEvent::FocusChanged(None));
        }

        self.emit(StoreEvent::ClusterDeleted(removal.clone()));
        Ok(removal)
    }

    /// Flips a cluster in or out of the active set. Returns whether it is
    /// active afterwards.
    pub fn toggle_cluster(&mut self, cluster_id: &str) -> Result<bool> {
        if self.universe.cluster(cluster_id).is_none() {
            return Err(GalaxyError::UnknownCluster(cluster_id.to_owned()));
        }

        let active = if self.is_active(cluster_id) {
            self.active_cluster_ids.retain(|id| id != cluster_id);
            false
        } else {
            self.active_cluster_ids.push(cluster_id.to_owned());
            true
        };

        debug!(cluster = cluster_id, active, "toggled cluster");
        self.emit(StoreEvent::FilterChanged);
        Ok(active)
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        if self.sort_order != sort_order {
            self.sort_order = sort_order;
            self.emit(StoreEvent::FilterChanged);
        }
    }

    pub fn set_max_visible_notes(&mut self, max_visible_notes: usize) {
        if self.max_visible_notes != max_visible_notes {
            self.max_visible_notes = max_visible_notes;
            self.emit(StoreEvent::FilterChanged);
        }
    }

    pub fn set_focus(&mut self, note_id: Option<&str>) -> Result<()> {
        if let Some(id) = note_id
            && self.universe.note(id).is_none()
        {
            return Err(GalaxyError::UnknownNote(id.to_owned()));
        }

        let focused = note_id.map(str::to_owned);
        if self.focused != focused {
            self.focused = focused.clone();
            self.emit(StoreEvent::FocusChanged(focused));
        }
        Ok(())
    }

    pub fn focused_note(&self) -> Option<&Note> {
        self.focused
            .as_deref()
            .and_then(|id| self.universe.note(id))
    }

    pub fn visible(&self) -> VisibleData<'_> {
        get_visible_data(
            &self.universe,
            &self.active_cluster_ids,
            self.sort_order,
            self.max_visible_notes,
        )
    }

    /// Nearest neighbours of the focused note across the whole dataset,
    /// regardless of what is currently visible. Empty without a focus.
    pub fn deep_dive(&self, k: usize) -> Result<Vec<Note>> {
        if k == 0 {
            return Err(GalaxyError::InvalidNeighborCount);
        }
        match self.focused_note() {
            Some(target) => proximity::nearest(target, &self.universe.notes, k),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(notes: i64) -> UniverseStore {
        let generator = GeneratorConfig {
            seed: Some(99),
            ..GeneratorConfig::default()
        };
        let mut store = UniverseStore::new(generator, SortOrder::Newest, 400);
        store.regenerate(notes);
        store
    }

    #[test]
    fn empty_store_is_usable_before_generation() {
        let store = UniverseStore::new(GeneratorConfig::default(), SortOrder::Newest, 400);
        assert!(store.universe().is_empty());
        assert_eq!(store.visible(), VisibleData::default());
        assert_eq!(store.deep_dive(5), Ok(Vec::new()));
    }

    #[test]
    fn regenerate_activates_every_cluster() {
        let store = seeded(120);
        assert_eq!(store.universe().notes.len(), 120);
        assert_eq!(store.active_cluster_ids().len(), store.universe().clusters.len());
        assert_eq!(store.visible().notes.len(), 120);
    }

    #[test]
    fn negative_regeneration_clamps_to_zero() {
        let mut store = seeded(50);
        assert_eq!(store.regenerate(-3), 0);
        assert!(store.universe().notes.is_empty());
        assert_eq!(store.universe().clusters.len(), 5);
    }

    #[test]
    fn seeded_stores_generate_identical_layouts() {
        let first = seeded(80);
        let second = seeded(80);
        let positions = |store: &UniverseStore| {
            store
                .universe()
                .notes
                .iter()
                .map(|note| note.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(&first), positions(&second));
    }

    #[test]
    fn delete_cluster_cascades_and_notifies() {
        let mut store = seeded(200);
        let events = store.subscribe();

        let removal = store.delete_cluster("ai").expect("ai cluster exists");

        assert!(store.universe().cluster("ai").is_none());
        assert!(!store.is_active("ai"));
        assert_eq!(store.universe().note_count_in("ai"), 0);
        assert_eq!(
            store.universe().notes.len() + removal.notes_removed,
            200
        );
        assert!(store.visible().sub_clusters.iter().all(|s| s.cluster_id != "ai"));
        assert_eq!(events.try_recv(), Ok(StoreEvent::ClusterDeleted(removal)));

        assert_eq!(
            store.delete_cluster("ai"),
            Err(GalaxyError::UnknownCluster("ai".to_owned()))
        );
    }

    #[test]
    fn deleting_focused_cluster_clears_focus() {
        let mut store = seeded(100);
        let note = store
            .universe()
            .notes
            .iter()
            .find(|note| note.cluster_id == "history")
            .map(|note| note.id.clone())
            .expect("history has notes");
        store.set_focus(Some(&note)).expect("note exists");
        let events = store.subscribe();

        store.delete_cluster("history").expect("history exists");

        assert!(store.focused_note().is_none());
        assert_eq!(events.try_recv(), Ok(StoreEvent::FocusChanged(None)));
    }

    #[test]
    fn regenerating_announces_cleared_focus() {
        let mut store = seeded(40);
        let note = store.universe().notes[0].id.clone();
        store.set_focus(Some(&note)).expect("note exists");
        let events = store.subscribe();

        store.regenerate(20);

        assert!(store.focused_note().is_none());
        assert_eq!(events.try_recv(), Ok(StoreEvent::Regenerated { notes: 20 }));
        assert_eq!(events.try_recv(), Ok(StoreEvent::FocusChanged(None)));

        store.regenerate(10);
        assert_eq!(events.try_recv(), Ok(StoreEvent::Regenerated { notes: 10 }));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn toggle_round_trips_visible_set() {
        let mut store = seeded(150);
        let before = store
            .visible()
            .notes
            .iter()
            .map(|note| note.id.clone())
            .collect::<Vec<_>>();

        assert_eq!(store.toggle_cluster("java"), Ok(false));
        assert!(store.visible().notes.iter().all(|note| note.cluster_id != "java"));
        assert_eq!(store.toggle_cluster("java"), Ok(true));

        let after = store
            .visible()
            .notes
            .iter()
            .map(|note| note.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(before, after);
        assert!(store.toggle_cluster("nope").is_err());
    }

    #[test]
    fn filter_changes_emit_only_on_change() {
        let mut store = seeded(10);
        let events = store.subscribe();

        store.set_sort_order(SortOrder::Newest);
        store.set_max_visible_notes(400);
        assert!(events.try_recv().is_err());

        store.set_sort_order(SortOrder::Oldest);
        store.set_max_visible_notes(3);
        assert_eq!(events.try_recv(), Ok(StoreEvent::FilterChanged));
        assert_eq!(events.try_recv(), Ok(StoreEvent::FilterChanged));
        assert_eq!(store.visible().notes.len(), 3);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut store = seeded(10);
        let kept = store.subscribe();
        drop(store.subscribe());

        store.regenerate(5);

        assert_eq!(kept.try_recv(), Ok(StoreEvent::Regenerated { notes: 5 }));
        assert_eq!(store.subscribers.len(), 1);
    }

    #[test]
    fn deep_dive_ranks_whole_dataset() {
        let mut store = seeded(300);
        store.set_max_visible_notes(1);
        let target = store.universe().notes[42].id.clone();
        store.set_focus(Some(&target)).expect("note exists");

        let neighbours = store.deep_dive(proximity::DEEP_DIVE_NEIGHBORS).expect("k > 0");

        assert_eq!(neighbours.len(), proximity::DEEP_DIVE_NEIGHBORS);
        assert!(neighbours.iter().all(|note| note.id != target));
        assert!(neighbours.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(store.deep_dive(0), Err(GalaxyError::InvalidNeighborCount));
    }

    #[test]
    fn unknown_focus_is_rejected() {
        let mut store = seeded(5);
        assert_eq!(
            store.set_focus(Some("note-999")),
            Err(GalaxyError::UnknownNote("note-999".to_owned()))
        );
        assert!(store.set_focus(None).is_ok());
    }
}
