use eframe::egui::{self, Rect, Ui};

use logos_galaxy::viewport::Transform;
use logos_galaxy::visibility::note_lod;

use super::super::render_utils::{screen_to_canvas, screen_to_world};
use super::super::{Scene, ViewModel};

/// Pointer slack around a star, in screen pixels.
const HOVER_SLACK_PX: f32 = 6.0;

impl ViewModel {
    pub(in crate::app) fn handle_galaxy_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.viewport.wheel(scroll, screen_to_canvas(rect, pointer));
    }

    pub(in crate::app) fn handle_galaxy_pan(&mut self, response: &egui::Response) {
        if response.dragged() {
            self.viewport.pan_by(response.drag_delta());
        }
    }

    /// Index into `scene.notes` of the star under the pointer, if one is
    /// drawn at the current zoom.
    pub(in crate::app) fn hovered_note(
        ui: &Ui,
        rect: Rect,
        transform: Transform,
        scene: &Scene,
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        let world = screen_to_world(rect, transform, pointer);
        let slack = HOVER_SLACK_PX / transform.scale;
        let reach = note_lod(transform.scale, scene.max_note_size)?.diameter / 2.0 + slack;

        let index = scene.index.hit_test(world, reach)?;
        let note = &scene.notes[index];
        let marker = note_lod(transform.scale, note.size)?;
        ((note.position - world).length() <= marker.diameter / 2.0 + slack).then_some(index)
    }

    /// Single click focuses, double click dives in, a click on empty space
    /// clears the focus.
    pub(in crate::app) fn apply_galaxy_selection(
        &mut self,
        response: &egui::Response,
        hovered_id: Option<String>,
    ) {
        if response.double_clicked() {
            if let Some(id) = hovered_id {
                self.deep_dive(&id);
            }
        } else if response.clicked() {
            self.set_focus(hovered_id.as_deref());
        }
    }
}
