use chrono::{DateTime, Utc};
use eframe::egui::{Color32, Vec2};

/// Top-level topic group.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub id: String,
    pub label: String,
    pub color: Color32,
    pub center: Vec2,
}

/// A solar system nested under exactly one [`Cluster`].
#[derive(Clone, Debug, PartialEq)]
pub struct SubCluster {
    pub id: String,
    pub label: String,
    pub color: Color32,
    pub center: Vec2,
    /// Gravity-well radius drawn around the center.
    pub radius: f32,
    pub cluster_id: String,
}

/// A star: one upload, highlight or summary placed in the galaxy.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub position: Vec2,
    /// Visual size scalar (the `z` component of the star).
    pub size: f32,
    pub cluster_id: String,
    /// `None` marks dust: bound to the cluster but to none of its systems.
    pub sub_cluster_id: Option<String>,
    /// Only populated on proximity query results.
    pub distance: Option<f32>,
}

impl Note {
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    pub fn is_dust(&self) -> bool {
        self.sub_cluster_id.is_none()
    }

    pub fn distance_to(&self, other: &Note) -> f32 {
        (self.position - other.position).length()
    }

    pub fn with_distance(&self, distance: f32) -> Note {
        Note {
            distance: Some(distance),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterRemoval {
    pub cluster: Cluster,
    pub sub_clusters_removed: usize,
    pub notes_removed: usize,
}

/// One generated galaxy. Replaced wholesale on regeneration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Universe {
    pub clusters: Vec<Cluster>,
    pub sub_clusters: Vec<SubCluster>,
    pub notes: Vec<Note>,
}

impl Universe {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.notes.is_empty()
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.id == id)
    }

    pub fn sub_cluster(&self, id: &str) -> Option<&SubCluster> {
        self.sub_clusters
            .iter()
            .find(|sub_cluster| sub_cluster.id == id)
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn sub_clusters_of<'a>(
        &'a self,
        cluster_id: &'a str,
    ) -> impl Iterator<Item = &'a SubCluster> {
        self.sub_clusters
            .iter()
            .filter(move |sub_cluster| sub_cluster.cluster_id == cluster_id)
    }

    pub fn note_count_in(&self, cluster_id: &str) -> usize {
        self.notes
            .iter()
            .filter(|note| note.cluster_id == cluster_id)
            .count()
    }

    /// Removes a cluster together with its solar systems and every note
    /// that referenced it. Unknown ids leave the universe untouched.
    pub fn remove_cluster(&mut self, cluster_id: &str) -> Option<ClusterRemoval> {
        let index = self
            .clusters
            .iter()
            .position(|cluster| cluster.id == cluster_id)?;
        let cluster = self.clusters.remove(index);

        let sub_clusters_before = self.sub_clusters.len();
        self.sub_clusters
            .retain(|sub_cluster| sub_cluster.cluster_id != cluster_id);

        let notes_before = self.notes.len();
        self.notes.retain(|note| note.cluster_id != cluster_id);

        Some(ClusterRemoval {
            cluster,
            sub_clusters_removed: sub_clusters_before - self.sub_clusters.len(),
            notes_removed: notes_before - self.notes.len(),
        })
    }
}
