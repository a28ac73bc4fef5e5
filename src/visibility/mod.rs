mod lod;

use std::collections::HashSet;

use serde::Deserialize;

use crate::universe::{Cluster, Note, SubCluster, Universe};

pub use lod::{
    CLUSTER_FADE_SPAN, CLUSTER_FADE_START, Glow, NOTE_BASE_DIAMETER, NOTE_GLOW_ZOOM,
    NOTE_MIN_ZOOM, NoteMarker, SUB_CLUSTER_FADE_IN_END, SUB_CLUSTER_FADE_IN_START,
    SUB_CLUSTER_FADE_OUT_SPAN, SUB_CLUSTER_FADE_OUT_START, cluster_lod, cluster_opacity, note_lod,
    sub_cluster_lod, sub_cluster_opacity,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Placeholder: keeps input order until a relevance signal exists.
    Relevance,
}

impl SortOrder {
    pub const ALL: [Self; 3] = [Self::Newest, Self::Oldest, Self::Relevance];

    pub fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest first",
            Self::Oldest => "Oldest first",
            Self::Relevance => "Relevance",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleData<'a> {
    pub notes: Vec<&'a Note>,
    pub clusters: Vec<&'a Cluster>,
    pub sub_clusters: Vec<&'a SubCluster>,
}

/// Derives what should be on screen from the authoritative dataset.
///
/// Ids in `active_cluster_ids` that name no existing cluster are ignored,
/// and anything pointing at a missing cluster is treated as an orphan and
/// left out. Notes are sorted with a stable sort before the cap applies.
pub fn get_visible_data<'a>(
    universe: &'a Universe,
    active_cluster_ids: &[String],
    sort_order: SortOrder,
    max_visible_notes: usize,
) -> VisibleData<'a> {
    let requested = active_cluster_ids
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>();

    let clusters = universe
        .clusters
        .iter()
        .filter(|cluster| requested.contains(cluster.id.as_str()))
        .collect::<Vec<_>>();
    let active = clusters
        .iter()
        .map(|cluster| cluster.id.as_str())
        .collect::<HashSet<_>>();

    let sub_clusters = universe
        .sub_clusters
        .iter()
        .filter(|sub_cluster| active.contains(sub_cluster.cluster_id.as_str()))
        .collect::<Vec<_>>();

    let mut notes = universe
        .notes
        .iter()
        .filter(|note| active.contains(note.cluster_id.as_str()))
        .collect::<Vec<_>>();

    match sort_order {
        SortOrder::Newest => notes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => notes.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Relevance => {}
    }
    notes.truncate(max_visible_notes);

    VisibleData {
        notes,
        clusters,
        sub_clusters,
    }
}
