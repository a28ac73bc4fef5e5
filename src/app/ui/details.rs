use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui, pos2, vec2};

use logos_galaxy::proximity::DEEP_DIVE_NEIGHBORS;
use logos_galaxy::util::format_distance;

use super::super::ViewModel;

/// Half-width of the world square the minimap shows.
const MINIMAP_WORLD_EXTENT: f32 = 4000.0;
const MINIMAP_SIZE: f32 = 200.0;
const MINIMAP_FLY_SCALE: f32 = 0.5;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Quick Navigation");
        ui.add_space(4.0);
        self.draw_minimap(ui);

        ui.separator();
        ui.heading("Focused Note");
        ui.add_space(6.0);

        let Some(note) = self.store.focused_note().cloned() else {
            ui.label("Click a star to focus it. Double-click to dive in.");
            return;
        };

        let universe = self.store.universe();
        let cluster_label = universe
            .cluster(&note.cluster_id)
            .map_or(note.cluster_id.as_str(), |cluster| cluster.label.as_str())
            .to_owned();
        let placement = match note.sub_cluster_id.as_deref() {
            Some(id) => universe
                .sub_cluster(id)
                .map_or_else(|| id.to_owned(), |system| format!("orbiting {}", system.label)),
            None => "drifting dust".to_owned(),
        };

        ui.label(RichText::new(&note.title).strong());
        ui.small(note.id.as_str());
        ui.add_space(6.0);
        ui.label(format!("Cluster: {cluster_label}"));
        ui.label(format!("Placement: {placement}"));
        ui.label(format!("Tags: {}", note.tags.join(", ")));
        ui.label(format!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M:%S UTC")));
        ui.label(format!(
            "Position: ({:.0}, {:.0})  size {:.2}",
            note.position.x, note.position.y, note.size
        ));
        ui.add_space(4.0);
        ui.label(RichText::new(&note.preview).italics());

        ui.horizontal(|ui| {
            if ui.button("Fly here").clicked() {
                self.viewport
                    .fly_to(note.position.x, note.position.y, Self::DEEP_DIVE_SCALE);
            }
            if ui.button("Clear focus").clicked() {
                self.set_focus(None);
            }
        });

        ui.separator();
        ui.label(RichText::new(format!("Nearest {DEEP_DIVE_NEIGHBORS} neighbours")).strong());
        if self.neighbors.is_empty() {
            ui.label("No other notes in the galaxy.");
            return;
        }

        let mut dive_into = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for neighbor in &self.neighbors {
                    let distance = neighbor.distance.map_or_else(String::new, format_distance);
                    let row = ui
                        .selectable_label(false, format!("{}  ·  {distance}", neighbor.title))
                        .on_hover_text(neighbor.id.as_str());
                    if row.clicked() {
                        dive_into = Some(neighbor.id.clone());
                    }
                }
            });

        if let Some(id) = dive_into {
            self.deep_dive(&id);
        }
    }

    fn draw_minimap(&mut self, ui: &mut Ui) {
        let (rect, _) = ui.allocate_exact_size(vec2(MINIMAP_SIZE, MINIMAP_SIZE), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 6.0, Color32::from_rgba_unmultiplied(0, 0, 0, 150));
        painter.line_segment(
            [rect.center() - vec2(4.0, 0.0), rect.center() + vec2(4.0, 0.0)],
            Stroke::new(1.0, Color32::from_white_alpha(50)),
        );
        painter.line_segment(
            [rect.center() - vec2(0.0, 4.0), rect.center() + vec2(0.0, 4.0)],
            Stroke::new(1.0, Color32::from_white_alpha(50)),
        );

        let to_map = |x: f32, y: f32| {
            let nx = (x + MINIMAP_WORLD_EXTENT) / (MINIMAP_WORLD_EXTENT * 2.0);
            let ny = (y + MINIMAP_WORLD_EXTENT) / (MINIMAP_WORLD_EXTENT * 2.0);
            pos2(rect.left() + nx * rect.width(), rect.top() + ny * rect.height())
        };

        let transform = self.viewport.snapshot().transform;
        let size = self.viewport.size();
        let top_left = transform.invert(pos2(0.0, 0.0));
        let bottom_right = transform.invert(size.to_pos2());
        let view_rect = egui::Rect::from_min_max(
            to_map(top_left.x, top_left.y),
            to_map(bottom_right.x, bottom_right.y),
        )
        .intersect(rect);
        if view_rect.is_positive() {
            painter.rect_stroke(
                view_rect,
                0.0,
                Stroke::new(1.0, Color32::from_white_alpha(90)),
                egui::StrokeKind::Inside,
            );
        }

        let mut target = None;
        for cluster in &self.store.universe().clusters {
            let center = to_map(cluster.center.x, cluster.center.y);
            let dot = egui::Rect::from_center_size(center, vec2(12.0, 12.0));
            let response = ui
                .interact(dot, ui.id().with(("minimap", &cluster.id)), Sense::click())
                .on_hover_text(format!("Go to {}", cluster.label));
            let radius = if response.hovered() { 7.0 } else { 5.0 };
            painter.circle_filled(center, radius + 3.0, cluster.color.gamma_multiply(0.3));
            painter.circle_filled(center, radius, cluster.color);
            if response.clicked() {
                target = Some(cluster.center);
            }
        }

        if let Some(center) = target {
            self.viewport.fly_to(center.x, center.y, MINIMAP_FLY_SCALE);
        }
        ui.small("Click a dot to travel there.");
    }
}
