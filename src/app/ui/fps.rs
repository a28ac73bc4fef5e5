use eframe::egui::Context;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 180;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar || self.fps_samples.is_empty() {
            return None;
        }

        let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        let low = self
            .fps_samples
            .iter()
            .copied()
            .reduce(f32::min)
            .unwrap_or(self.fps_current);

        Some(format!(
            "FPS {:.0} | avg {avg:.1} | low {low:.0} | {:.1} ms",
            self.fps_current,
            1000.0 / self.fps_current.max(f32::EPSILON)
        ))
    }

    /// Reads the published scale, so it matches what the canvas drew.
    pub(in crate::app) fn view_status_text(&self) -> String {
        let visible = self
            .scene
            .as_ref()
            .map_or(0, |scene| scene.notes.len());
        format!(
            "zoom {:.2}x | on screen {} / visible {}",
            self.viewport.current_scale(),
            self.visible_note_count.min(visible),
            visible
        )
    }
}
