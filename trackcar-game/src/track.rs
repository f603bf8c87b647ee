//! Track adherence: maps world positions onto the ground texture and decides
//! whether the pixel under the vehicle belongs to the (near-black) track.

use std::path::Path;

use glam::{uvec2, UVec2, Vec2};
use image::{Rgb, RgbImage};
use serde::Deserialize;

use crate::error::TrackError;

/// Colour data the track check reads from.
pub trait TrackTexture {
    fn dimensions(&self) -> UVec2;

    /// Colour at `texel`, which is always inside [`dimensions`](Self::dimensions).
    fn pixel(&self, texel: UVec2) -> Rgb<u8>;
}

impl TrackTexture for RgbImage {
    fn dimensions(&self) -> UVec2 {
        let (width, height) = RgbImage::dimensions(self);
        uvec2(width, height)
    }

    fn pixel(&self, texel: UVec2) -> Rgb<u8> {
        *self.get_pixel(texel.x, texel.y)
    }
}

/// How world coordinates map onto texture coordinates.
///
/// The texture covers the square `[-world_offset, world_extent - world_offset]`
/// on both axes; texture row 0 sits at the low-y edge.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackMapping {
    pub world_offset: f32,
    pub world_extent: f32,
    /// A pixel is track when every channel is strictly below this value.
    pub dark_threshold: u8,
}

impl Default for TrackMapping {
    fn default() -> Self {
        Self {
            world_offset: 10.0,
            world_extent: 20.0,
            dark_threshold: 10,
        }
    }
}

impl TrackMapping {
    /// Texel under `world`, or `None` when it falls outside the texture.
    pub fn texel(&self, world: Vec2, dimensions: UVec2) -> Option<UVec2> {
        let size = dimensions.as_vec2();
        let u = ((world.x + self.world_offset) * (size.x / self.world_extent)).floor();
        let v = ((world.y + self.world_offset) * (size.y / self.world_extent)).floor();

        // Written so that NaN lands outside too.
        if !(u >= 0.0 && u < size.x && v >= 0.0 && v < size.y) {
            return None;
        }

        Some(uvec2(u as u32, v as u32))
    }

    /// World-space centre of `texel`.
    pub fn world_position(&self, texel: UVec2, dimensions: UVec2) -> Vec2 {
        let scale = self.world_extent / dimensions.as_vec2();
        (texel.as_vec2() + 0.5) * scale - self.world_offset
    }

    pub fn is_dark(&self, color: Rgb<u8>) -> bool {
        color.0.iter().all(|&channel| channel < self.dark_threshold)
    }

    /// Lowest and highest world coordinate covered by the texture, per axis.
    pub fn world_range(&self) -> (f32, f32) {
        (-self.world_offset, self.world_extent - self.world_offset)
    }
}

pub struct TrackSampler {
    texture: Box<dyn TrackTexture>,
    mapping: TrackMapping,
}

impl TrackSampler {
    pub fn new(texture: impl TrackTexture + 'static, mapping: TrackMapping) -> Self {
        Self {
            texture: Box::new(texture),
            mapping,
        }
    }

    pub fn mapping(&self) -> &TrackMapping {
        &self.mapping
    }

    pub fn texture(&self) -> &dyn TrackTexture {
        self.texture.as_ref()
    }

    pub fn sample(&self, world: Vec2) -> Option<Rgb<u8>> {
        self.mapping
            .texel(world, self.texture.dimensions())
            .map(|texel| self.texture.pixel(texel))
    }

    /// Positions outside the texture are never on the track.
    pub fn is_on_track(&self, world: Vec2) -> bool {
        self.sample(world)
            .is_some_and(|color| self.mapping.is_dark(color))
    }
}

/// Loads a ground texture, decoding whatever format `image` supports.
pub fn load_track_image(path: impl AsRef<Path>) -> Result<RgbImage, TrackError> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|source| TrackError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return Err(TrackError::Empty {
            width: image.width(),
            height: image.height(),
        });
    }

    log::info!(
        "Loaded track image {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

const GRASS: Rgb<u8> = Rgb([46, 139, 60]);
const ASPHALT: Rgb<u8> = Rgb([4, 4, 4]);
const CURB: Rgb<u8> = Rgb([230, 230, 230]);

const CIRCUIT_RADIUS: f32 = 8.5;
const CIRCUIT_HALF_WIDTH: f32 = 1.25;
const CURB_WIDTH: f32 = 0.2;

/// Built-in ground texture: a ring circuit on grass that passes through the
/// default start position.
pub fn procedural_track(size: u32, mapping: &TrackMapping) -> RgbImage {
    let dimensions = uvec2(size, size);

    RgbImage::from_fn(size, size, |u, v| {
        let world = mapping.world_position(uvec2(u, v), dimensions);
        let off_centre = (world.length() - CIRCUIT_RADIUS).abs();

        if off_centre < CIRCUIT_HALF_WIDTH {
            ASPHALT
        } else if off_centre < CIRCUIT_HALF_WIDTH + CURB_WIDTH {
            CURB
        } else {
            GRASS
        }
    })
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    fn checker() -> RgbImage {
        // 20x20 texels over the default 20x20 world square: one texel per unit.
        RgbImage::from_fn(20, 20, |u, v| {
            if (u + v) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn texel_uses_offset_and_extent() {
        let mapping = TrackMapping::default();
        let dimensions = uvec2(200, 100);

        assert_eq!(mapping.texel(vec2(-10.0, -10.0), dimensions), Some(uvec2(0, 0)));
        assert_eq!(mapping.texel(vec2(0.0, 0.0), dimensions), Some(uvec2(100, 50)));
        assert_eq!(mapping.texel(vec2(9.99, 9.99), dimensions), Some(uvec2(199, 99)));
    }

    #[test]
    fn texel_outside_texture_is_none() {
        let mapping = TrackMapping::default();
        let dimensions = uvec2(20, 20);

        // u = -1
        assert_eq!(mapping.texel(vec2(-10.5, 0.0), dimensions), None);
        assert_eq!(mapping.texel(vec2(10.0, 0.0), dimensions), None);
        assert_eq!(mapping.texel(vec2(0.0, 12.0), dimensions), None);
        assert_eq!(mapping.texel(vec2(f32::NAN, 0.0), dimensions), None);
    }

    #[test]
    fn dark_requires_every_channel_below_threshold() {
        let mapping = TrackMapping::default();

        assert!(mapping.is_dark(Rgb([9, 9, 9])));
        assert!(!mapping.is_dark(Rgb([10, 0, 0])));
        assert!(!mapping.is_dark(Rgb([0, 0, 10])));
    }

    #[test]
    fn sampler_reads_pixel_under_position() {
        let sampler = TrackSampler::new(checker(), TrackMapping::default());

        // (-10, -10) -> texel (0, 0), black
        assert!(sampler.is_on_track(vec2(-9.5, -9.5)));
        // (-9, -10) -> texel (1, 0), white
        assert!(!sampler.is_on_track(vec2(-8.5, -9.5)));
        assert_eq!(sampler.sample(vec2(-8.5, -9.5)), Some(Rgb([255, 255, 255])));
    }

    #[test]
    fn out_of_texture_is_off_track_even_over_black() {
        let all_black = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
        let sampler = TrackSampler::new(all_black, TrackMapping::default());

        assert!(sampler.is_on_track(vec2(-9.5, 0.0)));
        assert!(!sampler.is_on_track(vec2(-10.5, 0.0)));
        assert_eq!(sampler.sample(vec2(-10.5, 0.0)), None);
    }

    #[test]
    fn world_position_round_trips_through_texel() {
        let mapping = TrackMapping::default();
        let dimensions = uvec2(64, 64);
        let texel = uvec2(17, 40);

        let world = mapping.world_position(texel, dimensions);

        assert_eq!(mapping.texel(world, dimensions), Some(texel));
    }

    #[test]
    fn procedural_track_covers_default_start() {
        let mapping = TrackMapping::default();
        let sampler = TrackSampler::new(procedural_track(256, &mapping), mapping);

        assert!(sampler.is_on_track(vec2(-3.0, 8.0)));
        assert!(!sampler.is_on_track(vec2(0.0, 0.0)));
        assert!(!sampler.is_on_track(vec2(9.5, 9.5)));
    }

    #[test]
    fn load_track_image_reports_missing_file() {
        let error = load_track_image("/nonexistent/track.png").unwrap_err();

        assert!(matches!(error, TrackError::Image { .. }));
    }
}
