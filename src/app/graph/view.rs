use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use logos_galaxy::visibility::{Glow, cluster_lod, note_lod, sub_cluster_lod};

use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, with_opacity, world_to_screen,
};
use super::super::{SearchMatchCache, ViewModel};

/// World radius of the nebula glow drawn behind each cluster label.
const CLUSTER_GLOW_RADIUS: f32 = 900.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Scene indices whose title fuzzy-matches the search box. `None` when
    /// the search box is empty.
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.scene_revision == self.scene_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let scene = self.scene.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = scene
            .notes
            .iter()
            .enumerate()
            .filter(|(_, note)| fuzzy_match_score(&matcher, &note.title, query).is_some())
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            scene_revision: self.scene_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_galaxy(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.viewport.set_viewport_size(rect.size());
        self.handle_galaxy_zoom(ui, rect, &response);
        self.handle_galaxy_pan(&response);

        let now = ui.input(|input| input.time);
        if self.viewport.tick(now) {
            ui.ctx().request_repaint();
        }

        // Everything below reads this one snapshot.
        let transform = self.viewport.end_frame().transform;
        let zoom = transform.scale;

        draw_background(&painter, rect, transform);

        let search_matches = self.cached_search_matches();
        let search_active = search_matches.is_some();
        let focused_id = self.store.focused_note().map(|note| note.id.clone());
        let show_quadtree_overlay = self.show_quadtree_overlay;

        let Some(scene) = self.scene.as_ref() else {
            self.visible_note_count = 0;
            return;
        };

        if show_quadtree_overlay {
            for cell in scene.index.cells() {
                let half = vec2(cell.half_extent, cell.half_extent);
                let min = world_to_screen(rect, transform, cell.center - half);
                let max = world_to_screen(rect, transform, cell.center + half);
                let alpha = if cell.is_leaf { 90 } else { 45 };
                let width = (1.4 - cell.depth as f32 * 0.09).clamp(0.45, 1.4);
                painter.rect_stroke(
                    egui::Rect::from_min_max(min, max),
                    0.0,
                    Stroke::new(width, Color32::from_rgba_unmultiplied(106, 198, 255, alpha)),
                    egui::StrokeKind::Middle,
                );
            }
        }

        if let Some(opacity) = cluster_lod(zoom) {
            for cluster in &scene.clusters {
                let center = world_to_screen(rect, transform, cluster.center);
                let radius = CLUSTER_GLOW_RADIUS * zoom;
                if !circle_visible(rect, center, radius) {
                    continue;
                }

                painter.circle_filled(center, radius, with_opacity(cluster.color, opacity * 0.08));
                painter.circle_filled(
                    center,
                    radius * 0.45,
                    with_opacity(cluster.color, opacity * 0.10),
                );
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    &cluster.label,
                    FontId::proportional(22.0),
                    with_opacity(Color32::WHITE, opacity),
                );
            }
        }

        if let Some(opacity) = sub_cluster_lod(zoom) {
            for system in &scene.sub_clusters {
                let center = world_to_screen(rect, transform, system.center);
                let radius = system.radius * zoom;
                if !circle_visible(rect, center, radius) {
                    continue;
                }

                painter.circle_filled(center, radius, with_opacity(system.color, opacity * 0.06));
                painter.circle_stroke(
                    center,
                    radius,
                    Stroke::new(1.2, with_opacity(system.color, opacity * 0.55)),
                );
                painter.circle_filled(center, 4.0, with_opacity(system.color, opacity));
                painter.text(
                    center + vec2(0.0, -radius - 6.0),
                    Align2::CENTER_BOTTOM,
                    &system.label,
                    FontId::proportional(13.0),
                    with_opacity(Color32::from_gray(225), opacity),
                );
            }
        }

        let hovered = Self::hovered_note(ui, rect, transform, scene);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if let Some(focused) = focused_id
            .as_deref()
            .and_then(|id| self.store.universe().note(id))
        {
            let from = world_to_screen(rect, transform, focused.position);
            for neighbor in &self.neighbors {
                let to = world_to_screen(rect, transform, neighbor.position);
                painter.line_segment(
                    [from, to],
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(245, 206, 93, 90)),
                );
            }
        }

        let highlight_color = Color32::from_rgb(103, 196, 255);
        let focus_color = Color32::from_rgb(245, 206, 93);
        let mut on_screen = 0usize;
        for (index, note) in scene.notes.iter().enumerate() {
            // Below the star threshold nothing is drawn at all.
            let Some(marker) = note_lod(zoom, note.size) else {
                break;
            };
            let position = world_to_screen(rect, transform, note.position);
            let radius = marker.diameter / 2.0 * zoom;
            let glow_radius = marker.glow.radius(marker.diameter) / 2.0 * zoom;
            if !circle_visible(rect, position, glow_radius.max(radius)) {
                continue;
            }
            on_screen += 1;

            let is_focused = focused_id.as_deref() == Some(note.id.as_str());
            let is_hovered = hovered == Some(index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base = scene.note_colors[index];
            let color = if is_focused {
                focus_color
            } else if is_hovered {
                blend_color(base, Color32::WHITE, 0.5)
            } else if is_match {
                blend_color(base, highlight_color, 0.68)
            } else if search_active {
                dim_color(base, 0.35)
            } else {
                base
            };

            let dimmed = if search_active && !is_match { 0.3 } else { 1.0 };
            let glow_alpha = marker.glow.intensity() * dimmed;
            painter.circle_filled(position, glow_radius, with_opacity(color, glow_alpha * 0.35));
            painter.circle_filled(position, radius.max(0.8), color);

            if is_focused || is_match {
                painter.circle_stroke(
                    position,
                    radius + 3.0,
                    Stroke::new(1.4, if is_focused { focus_color } else { highlight_color }),
                );
            }

            let show_label =
                is_focused || is_hovered || (is_match && zoom > 0.8) || marker.glow == Glow::Bright;
            if show_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    &note.title,
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }
        if let Some(index) = hovered {
            let note = &scene.notes[index];
            let placement = match note.sub_cluster_id.as_deref() {
                Some(system) => format!("system {system}"),
                None => "dust".to_owned(),
            };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  {placement}",
                    note.title,
                    note.primary_tag().unwrap_or("untagged")
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let hovered_id = hovered.map(|index| scene.notes[index].id.clone());
        self.visible_note_count = on_screen;
        if response.dragged() {
            ui.ctx().request_repaint();
        }
        self.apply_galaxy_selection(&response, hovered_id);
    }
}
