use eframe::egui::{self, Color32, RichText, Ui};
use tracing::warn;

use logos_galaxy::visibility::SortOrder;

use super::super::ViewModel;

const MAX_NOTE_REQUEST: i64 = 20_000;
const MAX_VISIBLE_CAP: usize = 5_000;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Galaxy Controls");
        ui.add_space(6.0);

        ui.label("Search titles");
        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("fuzzy match, e.g. adv jvm"),
        )
        .on_hover_text("Highlight notes whose title fuzzy-matches this query.");

        ui.separator();
        self.draw_cluster_filters(ui);

        ui.separator();
        ui.label(RichText::new("Sort order").strong());
        let mut sort_order = self.store.sort_order();
        ui.horizontal_wrapped(|ui| {
            for order in SortOrder::ALL {
                ui.selectable_value(&mut sort_order, order, order.label());
            }
        });
        self.store.set_sort_order(sort_order);

        let cap_slider = ui
            .add(
                egui::Slider::new(&mut self.max_visible_notes, 0..=MAX_VISIBLE_CAP)
                    .step_by(10.0)
                    .text("Max visible notes"),
            )
            .on_hover_text("Only the first notes of the sorted list are drawn.");
        if cap_slider.changed() {
            self.store.set_max_visible_notes(self.max_visible_notes);
        }

        ui.separator();
        ui.label(RichText::new("Generation").strong());
        ui.horizontal(|ui| {
            ui.add(
                egui::DragValue::new(&mut self.requested_notes)
                    .range(0..=MAX_NOTE_REQUEST)
                    .speed(10.0)
                    .suffix(" notes"),
            );
            if ui
                .button("Regenerate")
                .on_hover_text("Replace the whole galaxy with a fresh generation.")
                .clicked()
            {
                self.store.regenerate(self.requested_notes);
            }
        });

        ui.separator();
        if ui
            .button("Reset view")
            .on_hover_text("Center the galaxy at the initial zoom.")
            .clicked()
        {
            self.viewport.reset();
        }

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");

        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the spatial index partitions over the galaxy.");

        ui.add_space(8.0);
        ui.small("Drag to pan, scroll to zoom. Click a star to focus it, double-click to dive in.");
    }

    fn draw_cluster_filters(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Clusters").strong());

        let clusters = self
            .store
            .universe()
            .clusters
            .iter()
            .map(|cluster| {
                (
                    cluster.id.clone(),
                    cluster.label.clone(),
                    cluster.color,
                    self.store.universe().note_count_in(&cluster.id),
                )
            })
            .collect::<Vec<_>>();

        if clusters.is_empty() {
            ui.label("No clusters. Regenerate to create a galaxy.");
            return;
        }

        let mut toggled = None;
        let mut deleted = None;
        for (id, label, color, note_count) in &clusters {
            ui.horizontal(|ui| {
                let mut active = self.store.is_active(id);
                let text = RichText::new(format!("{label} ({note_count})")).color(*color);
                if ui.checkbox(&mut active, text).changed() {
                    toggled = Some(id.clone());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button(RichText::new("Delete").color(Color32::from_rgb(239, 68, 68)))
                        .on_hover_text("Remove this cluster with its systems and notes.")
                        .clicked()
                    {
                        deleted = Some(id.clone());
                    }
                });
            });
        }

        if let Some(id) = toggled
            && let Err(error) = self.store.toggle_cluster(&id)
        {
            warn!(%error, "toggle failed");
        }
        if let Some(id) = deleted
            && let Err(error) = self.store.delete_cluster(&id)
        {
            warn!(%error, "delete failed");
        }
    }
}
