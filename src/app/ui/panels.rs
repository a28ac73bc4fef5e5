use std::collections::VecDeque;
use std::sync::mpsc::TryRecvError;

use eframe::egui::{self, Align, Context, Layout};
use tracing::{debug, warn};

use logos_galaxy::config::AppConfig;
use logos_galaxy::proximity::{DEEP_DIVE_NEIGHBORS, SpatialIndex};
use logos_galaxy::universe::{StoreEvent, UniverseStore};
use logos_galaxy::util::string_to_color;
use logos_galaxy::viewport::Viewport;

use super::super::{Scene, ViewModel};

impl ViewModel {
    /// Zoom used when diving into a single note.
    pub(in crate::app) const DEEP_DIVE_SCALE: f32 = 1.5;

    pub(in crate::app) fn new(config: AppConfig) -> Self {
        let mut store = UniverseStore::new(
            config.generator.clone(),
            config.filter.sort_order,
            config.filter.max_visible_notes,
        );
        let store_events = store.subscribe();
        store.regenerate(config.initial_notes);

        Self {
            store,
            store_events,
            viewport: Viewport::new(&config.viewport),
            requested_notes: config.initial_notes.max(0),
            max_visible_notes: config.filter.max_visible_notes,
            search: String::new(),
            show_quadtree_overlay: false,
            show_fps_bar: true,
            scene_dirty: true,
            neighbors_dirty: true,
            scene_revision: 0,
            scene: None,
            neighbors: Vec::new(),
            search_match_cache: None,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            visible_note_count: 0,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.update_fps_counter(ctx);
        self.sync_with_store();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Logos Galaxy");
                    ui.separator();
                    let universe = self.store.universe();
                    ui.label(format!("clusters: {}", universe.clusters.len()));
                    ui.label(format!("systems: {}", universe.sub_clusters.len()));
                    ui.label(format!("notes: {}", universe.notes.len()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.view_status_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_galaxy(ui));

        // Mutations made by this frame's widgets land before the next read.
        self.sync_with_store();
    }

    /// Drains store notifications and rebuilds whatever they invalidate.
    pub(in crate::app) fn sync_with_store(&mut self) {
        loop {
            match self.store_events.try_recv() {
                Ok(event) => {
                    debug!(?event, "store event");
                    match event {
                        StoreEvent::Regenerated { .. } | StoreEvent::ClusterDeleted(_) => {
                            self.scene_dirty = true;
                            self.neighbors_dirty = true;
                        }
                        StoreEvent::FilterChanged => self.scene_dirty = true,
                        StoreEvent::FocusChanged(_) => self.neighbors_dirty = true,
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("store event channel closed");
                    break;
                }
            }
        }

        if self.scene_dirty {
            self.rebuild_scene();
        }
        if self.neighbors_dirty {
            self.refresh_neighbors();
        }
    }

    fn rebuild_scene(&mut self) {
        let visible = self.store.visible();
        let notes = visible
            .notes
            .iter()
            .map(|note| (*note).clone())
            .collect::<Vec<_>>();
        let note_colors = notes.iter().map(|note| string_to_color(&note.id)).collect();
        let max_note_size = notes.iter().map(|note| note.size).fold(0.0, f32::max);

        self.scene = Some(Scene {
            clusters: visible.clusters.into_iter().cloned().collect(),
            sub_clusters: visible.sub_clusters.into_iter().cloned().collect(),
            index: SpatialIndex::build(&notes),
            note_colors,
            max_note_size,
            notes,
        });
        self.scene_revision += 1;
        self.scene_dirty = false;
    }

    fn refresh_neighbors(&mut self) {
        self.neighbors = match self.store.deep_dive(DEEP_DIVE_NEIGHBORS) {
            Ok(neighbors) => neighbors,
            Err(error) => {
                warn!(%error, "deep dive failed");
                Vec::new()
            }
        };
        self.neighbors_dirty = false;
    }

    pub(in crate::app) fn set_focus(&mut self, note_id: Option<&str>) {
        if let Err(error) = self.store.set_focus(note_id) {
            warn!(%error, "could not change focus");
        }
    }

    /// Focuses `note_id` and flies the view onto it.
    pub(in crate::app) fn deep_dive(&mut self, note_id: &str) {
        self.set_focus(Some(note_id));
        if let Some(note) = self.store.focused_note() {
            let target = note.position;
            self.viewport
                .fly_to(target.x, target.y, Self::DEEP_DIVE_SCALE);
        }
    }
}
