//! Continuous level-of-detail bands keyed to the zoom scale.
//!
//! Each `*_lod` function returns `None` when the entity must not be
//! rendered at all, which keeps faded-out markers from intercepting the
//! pointer.

pub const CLUSTER_FADE_START: f32 = 0.5;
pub const CLUSTER_FADE_SPAN: f32 = 2.0;

pub const SUB_CLUSTER_FADE_IN_START: f32 = 0.4;
pub const SUB_CLUSTER_FADE_IN_END: f32 = 0.6;
pub const SUB_CLUSTER_FADE_OUT_START: f32 = 2.5;
pub const SUB_CLUSTER_FADE_OUT_SPAN: f32 = 1.0;

pub const NOTE_MIN_ZOOM: f32 = 0.25;
pub const NOTE_BASE_DIAMETER: f32 = 6.0;
pub const NOTE_GLOW_ZOOM: f32 = 1.5;

pub fn cluster_opacity(zoom: f32) -> f32 {
    (1.0 - (zoom - CLUSTER_FADE_START) / CLUSTER_FADE_SPAN).clamp(0.0, 1.0)
}

pub fn cluster_lod(zoom: f32) -> Option<f32> {
    let opacity = cluster_opacity(zoom);
    (opacity > 0.0).then_some(opacity)
}

pub fn sub_cluster_opacity(zoom: f32) -> f32 {
    if zoom < SUB_CLUSTER_FADE_IN_START {
        0.0
    } else if zoom < SUB_CLUSTER_FADE_IN_END {
        (zoom - SUB_CLUSTER_FADE_IN_START) / (SUB_CLUSTER_FADE_IN_END - SUB_CLUSTER_FADE_IN_START)
    } else if zoom > SUB_CLUSTER_FADE_OUT_START {
        (1.0 - (zoom - SUB_CLUSTER_FADE_OUT_START) / SUB_CLUSTER_FADE_OUT_SPAN).max(0.0)
    } else {
        1.0
    }
}

pub fn sub_cluster_lod(zoom: f32) -> Option<f32> {
    let opacity = sub_cluster_opacity(zoom);
    (opacity > 0.0).then_some(opacity)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glow {
    Soft,
    Bright,
}

impl Glow {
    pub fn radius(self, diameter: f32) -> f32 {
        match self {
            Self::Soft => diameter,
            Self::Bright => diameter * 3.0,
        }
    }

    pub fn intensity(self) -> f32 {
        match self {
            Self::Soft => 0.25,
            Self::Bright => 0.6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteMarker {
    /// Diameter in world units; shrinks as the view zooms in.
    pub diameter: f32,
    pub glow: Glow,
}

pub fn note_lod(zoom: f32, size: f32) -> Option<NoteMarker> {
    if zoom < NOTE_MIN_ZOOM {
        return None;
    }

    let glow = if zoom > NOTE_GLOW_ZOOM {
        Glow::Bright
    } else {
        Glow::Soft
    };

    Some(NoteMarker {
        diameter: NOTE_BASE_DIAMETER * size / zoom.sqrt(),
        glow,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn cluster_band() {
        assert_eq!(cluster_opacity(0.1), 1.0);
        assert_eq!(cluster_opacity(0.5), 1.0);
        assert!(close(cluster_opacity(1.5), 0.5));
        assert_eq!(cluster_opacity(2.5), 0.0);
        assert_eq!(cluster_lod(2.5), None);
        assert_eq!(cluster_lod(7.0), None);
        assert!(cluster_lod(2.4).is_some());
    }

    #[test]
    fn sub_cluster_band() {
        assert_eq!(sub_cluster_lod(0.3), None);
        assert_eq!(sub_cluster_lod(0.4), None);
        assert!(close(sub_cluster_opacity(0.5), 0.5));
        assert_eq!(sub_cluster_opacity(0.6), 1.0);
        assert_eq!(sub_cluster_opacity(1.8), 1.0);
        assert_eq!(sub_cluster_opacity(2.5), 1.0);
        assert!(close(sub_cluster_opacity(3.0), 0.5));
        assert_eq!(sub_cluster_lod(3.5), None);
        assert_eq!(sub_cluster_lod(5.0), None);
    }

    #[test]
    fn note_band() {
        assert_eq!(note_lod(0.2, 1.0), None);

        let marker = note_lod(0.25, 1.0).expect("visible at the threshold");
        assert!(close(marker.diameter, 12.0));
        assert_eq!(marker.glow, Glow::Soft);

        let marker = note_lod(4.0, 1.5).expect("visible when zoomed in");
        assert!(close(marker.diameter, 4.5));
        assert_eq!(marker.glow, Glow::Bright);
        assert_eq!(note_lod(1.5, 1.0).map(|m| m.glow), Some(Glow::Soft));
    }

    #[test]
    fn glow_steps_up() {
        assert!(Glow::Bright.radius(4.0) > Glow::Soft.radius(4.0));
        assert!(Glow::Bright.intensity() > Glow::Soft.intensity());
    }

    proptest! {
        #[test]
        fn cluster_fade_never_increases(a in 0.5f32..12.0, b in 0.5f32..12.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(cluster_opacity(high) <= cluster_opacity(low));
            if high >= 2.5 {
                prop_assert!(cluster_lod(high).is_none());
            }
        }

        #[test]
        fn opacities_stay_in_unit_range(zoom in 0.0f32..20.0) {
            prop_assert!((0.0..=1.0).contains(&cluster_opacity(zoom)));
            prop_assert!((0.0..=1.0).contains(&sub_cluster_opacity(zoom)));
        }
    }
}
