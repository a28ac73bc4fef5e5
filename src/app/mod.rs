use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use eframe::egui::{Color32, Context};

use logos_galaxy::config::AppConfig;
use logos_galaxy::proximity::SpatialIndex;
use logos_galaxy::universe::{Cluster, Note, StoreEvent, SubCluster, UniverseStore};
use logos_galaxy::viewport::Viewport;

mod graph;
mod render_utils;
mod ui;

pub struct GalaxyApp {
    model: Box<ViewModel>,
}

struct ViewModel {
    store: UniverseStore,
    store_events: Receiver<StoreEvent>,
    viewport: Viewport,
    requested_notes: i64,
    max_visible_notes: usize,
    search: String,
    show_quadtree_overlay: bool,
    show_fps_bar: bool,
    scene_dirty: bool,
    neighbors_dirty: bool,
    scene_revision: u64,
    scene: Option<Scene>,
    neighbors: Vec<Note>,
    search_match_cache: Option<SearchMatchCache>,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    visible_note_count: usize,
}

/// Owned copy of the visible set plus per-frame lookups built from it.
/// Rebuilt only when the store reports a change.
struct Scene {
    clusters: Vec<Cluster>,
    sub_clusters: Vec<SubCluster>,
    notes: Vec<Note>,
    note_colors: Vec<Color32>,
    max_note_size: f32,
    index: SpatialIndex,
}

struct SearchMatchCache {
    query: String,
    scene_revision: u64,
    matches: Arc<HashSet<usize>>,
}

impl GalaxyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            model: Box::new(ViewModel::new(config)),
        }
    }
}

impl eframe::App for GalaxyApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.model.show(ctx);
    }
}
