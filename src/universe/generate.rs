use std::f32::consts::{PI, TAU};

use chrono::{DateTime, Utc};
use eframe::egui::{Vec2, vec2};
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::util::shift_brightness;

use super::catalog::{NOTE_PREFIXES, NOTE_SUFFIXES, PLACEHOLDER_PREVIEW, TOPICS, Topic};
use super::model::{Cluster, Note, SubCluster, Universe};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Distance of every cluster center from the origin.
    pub cluster_radius: f32,
    /// Base distance of solar systems from their cluster center.
    pub sub_cluster_radius: f32,
    /// Upper bound of the random offset added to `sub_cluster_radius`.
    pub sub_cluster_jitter: f32,
    /// Maximum angular offset (radians) applied to each solar system.
    pub angular_jitter: f32,
    pub well_radius_min: f32,
    pub well_radius_max: f32,
    /// Standard deviation of notes bound to a solar system.
    pub bound_spread: f32,
    /// Standard deviation of dust notes around their cluster center.
    pub dust_spread: f32,
    pub binding_probability: f64,
    pub size_min: f32,
    pub size_max: f32,
    pub color_delta: i16,
    pub seed: Option<u64>,
    #[serde(skip, default = "default_topics")]
    pub topics: Vec<Topic>,
}

fn default_topics() -> Vec<Topic> {
    TOPICS.to_vec()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            cluster_radius: 2000.0,
            sub_cluster_radius: 650.0,
            sub_cluster_jitter: 200.0,
            angular_jitter: 0.25,
            well_radius_min: 150.0,
            well_radius_max: 260.0,
            bound_spread: 50.0,
            dust_spread: 600.0,
            binding_probability: 0.7,
            size_min: 0.5,
            size_max: 1.5,
            color_delta: 32,
            seed: None,
            topics: default_topics(),
        }
    }
}

impl GeneratorConfig {
    /// Repairs ranges a hand-edited config may have inverted or overdrawn.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();
        config.cluster_radius = bounded(config.cluster_radius, defaults.cluster_radius);
        config.sub_cluster_radius =
            bounded(config.sub_cluster_radius, defaults.sub_cluster_radius);
        config.sub_cluster_jitter =
            bounded(config.sub_cluster_jitter, defaults.sub_cluster_jitter).abs();
        config.angular_jitter = if config.angular_jitter.is_finite() {
            config.angular_jitter.abs().min(PI)
        } else {
            defaults.angular_jitter
        };
        config.well_radius_min = bounded(config.well_radius_min, defaults.well_radius_min);
        config.well_radius_max = bounded(config.well_radius_max, defaults.well_radius_max);
        config.bound_spread = bounded(config.bound_spread, defaults.bound_spread).abs();
        config.dust_spread = bounded(config.dust_spread, defaults.dust_spread).abs();
        config.size_min = bounded(config.size_min, defaults.size_min);
        config.size_max = bounded(config.size_max, defaults.size_max);
        config.binding_probability = if config.binding_probability.is_finite() {
            config.binding_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if config.well_radius_min > config.well_radius_max {
            std::mem::swap(&mut config.well_radius_min, &mut config.well_radius_max);
        }
        if config.size_min > config.size_max {
            std::mem::swap(&mut config.size_min, &mut config.size_max);
        }
        config
    }
}

/// Largest magnitude accepted for any distance or size parameter.
const MAX_PARAMETER: f32 = 1.0e6;

/// Non-finite values fall back to `fallback`; finite ones are clamped so
/// that sampling ranges built from them stay finite.
fn bounded(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-MAX_PARAMETER, MAX_PARAMETER)
    } else {
        fallback
    }
}

/// Negative requests are a display-parameter mistake, not a failure.
pub fn clamp_note_count(requested: i64) -> usize {
    if requested < 0 {
        warn!(requested, "negative note count requested, generating none");
        return 0;
    }
    usize::try_from(requested).unwrap_or(usize::MAX)
}

/// Box-Muller transform: two uniform draws, one normal variate.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f32, std_dev: f32) -> f32 {
    let u = 1.0 - rng.random::<f64>();
    let v = rng.random::<f64>();
    let z = (-2.0 * u.ln()).sqrt() * (std::f64::consts::TAU * v).cos();
    (z * std_dev as f64 + mean as f64) as f32
}

fn sample_around<R: Rng + ?Sized>(rng: &mut R, center: Vec2, std_dev: f32) -> Vec2 {
    let x = sample_normal(rng, center.x, std_dev);
    let y = sample_normal(rng, center.y, std_dev);
    vec2(x, y)
}

fn build_clusters(topics: &[Topic], radius: f32) -> Vec<Cluster> {
    let count = topics.len();
    topics
        .iter()
        .enumerate()
        .map(|(index, topic)| {
            let angle = (index as f32 / count as f32) * TAU;
            Cluster {
                id: topic.id.to_owned(),
                label: topic.label.to_owned(),
                color: topic.color,
                center: vec2(angle.cos(), angle.sin()) * radius,
            }
        })
        .collect()
}

fn build_sub_clusters<R: Rng + ?Sized>(
    topic: &Topic,
    cluster: &Cluster,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<SubCluster> {
    let count = topic.sub_topics.len();
    topic
        .sub_topics
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let angle = (index as f32 / count as f32) * TAU
                + rng.random_range(-config.angular_jitter..=config.angular_jitter);
            let distance =
                config.sub_cluster_radius + rng.random_range(0.0..=config.sub_cluster_jitter);
            let delta = if index % 2 == 0 {
                config.color_delta
            } else {
                -config.color_delta
            };

            SubCluster {
                id: format!("{}-{index}", cluster.id),
                label: (*label).to_owned(),
                color: shift_brightness(cluster.color, delta),
                center: cluster.center + vec2(angle.cos(), angle.sin()) * distance,
                radius: rng.random_range(config.well_radius_min..=config.well_radius_max),
                cluster_id: cluster.id.clone(),
            }
        })
        .collect()
}

/// Builds a complete universe in one pass: clusters on a circle around the
/// origin, solar systems on smaller circles around each cluster, then
/// `count` notes that either orbit a solar system tightly or drift as dust
/// around their cluster.
pub fn generate_universe<R: Rng + ?Sized>(
    count: usize,
    config: &GeneratorConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Universe {
    let config = config.sanitized();
    let clusters = build_clusters(&config.topics, config.cluster_radius);

    let mut sub_clusters = Vec::new();
    let mut systems_by_cluster = Vec::with_capacity(clusters.len());
    for (topic, cluster) in config.topics.iter().zip(&clusters) {
        let first = sub_clusters.len();
        sub_clusters.extend(build_sub_clusters(topic, cluster, &config, rng));
        systems_by_cluster.push(first..sub_clusters.len());
    }

    if clusters.is_empty() {
        if count > 0 {
            warn!(count, "topic catalog is empty, no notes can be placed");
        }
        return Universe::default();
    }

    let mut notes = Vec::with_capacity(count);
    for index in 0..count {
        let cluster_index = rng.random_range(0..clusters.len());
        let cluster = &clusters[cluster_index];
        let systems = systems_by_cluster[cluster_index].clone();

        let bound = !systems.is_empty() && rng.random_bool(config.binding_probability);
        let (position, sub_cluster_id, anchor_label) = if bound {
            let system = &sub_clusters[rng.random_range(systems)];
            (
                sample_around(rng, system.center, config.bound_spread),
                Some(system.id.clone()),
                system.label.as_str(),
            )
        } else {
            (
                sample_around(rng, cluster.center, config.dust_spread),
                None,
                cluster.label.as_str(),
            )
        };

        let title = format!(
            "{} {anchor_label} {}",
            NOTE_PREFIXES[index % NOTE_PREFIXES.len()],
            NOTE_SUFFIXES[index % NOTE_SUFFIXES.len()]
        );

        notes.push(Note {
            id: format!("note-{index}"),
            title,
            preview: PLACEHOLDER_PREVIEW.to_owned(),
            tags: vec![cluster.label.clone()],
            created_at: now,
            position,
            size: rng.random_range(config.size_min..=config.size_max),
            cluster_id: cluster.id.clone(),
            sub_cluster_id,
            distance: None,
        });
    }

    debug!(
        clusters = clusters.len(),
        sub_clusters = sub_clusters.len(),
        notes = notes.len(),
        "generated universe"
    );

    Universe {
        clusters,
        sub_clusters,
        notes,
    }
}
