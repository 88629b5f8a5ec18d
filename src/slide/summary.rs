use serde::Serialize;

use crate::geometry::Rect;
use crate::raster::DataType;

use super::compression::Compression;
use super::level::{LevelInfo, Resolution};
use super::registry::Slide;
use super::scene::Scene;

/// Serializable snapshot of scene metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub name: String,
    pub rect: Rect,
    pub channels: usize,
    pub data_types: Vec<DataType>,
    pub z_slices: usize,
    pub t_frames: usize,
    pub resolution: Resolution,
    pub z_slice_resolution: f64,
    pub t_frame_resolution: f64,
    pub magnification: f64,
    pub compression: Compression,
    pub levels: Vec<LevelInfo>,
    pub aux_images: Vec<String>,
}

impl SceneSummary {
    pub fn from_scene(scene: &dyn Scene) -> Self {
        Self {
            name: scene.name().to_string(),
            rect: scene.rect(),
            channels: scene.num_channels(),
            data_types: (0..scene.num_channels())
                .filter_map(|c| scene.channel_data_type(c))
                .collect(),
            z_slices: scene.num_z_slices(),
            t_frames: scene.num_t_frames(),
            resolution: scene.resolution(),
            z_slice_resolution: scene.z_slice_resolution(),
            t_frame_resolution: scene.t_frame_resolution(),
            magnification: scene.magnification(),
            compression: scene.compression(),
            levels: scene.levels().to_vec(),
            aux_images: scene.aux_image_names(),
        }
    }
}

/// Serializable snapshot of a slide and all its scenes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideSummary {
    pub path: String,
    pub scenes: Vec<SceneSummary>,
}

impl SlideSummary {
    pub fn from_slide(slide: &dyn Slide) -> Self {
        Self {
            path: slide.file_path().to_string(),
            scenes: (0..slide.num_scenes())
                .filter_map(|i| slide.scene(i))
                .map(SceneSummary::from_scene)
                .collect(),
        }
    }
}
