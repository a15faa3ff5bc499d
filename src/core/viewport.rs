use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Latitude at which the Mercator world becomes square
const MAX_LATITUDE: f64 = 85.0511287798;
/// Size in pixels of the whole world at zoom 0
const TILE_SIZE: f64 = 256.0;

/// What the map shows: center and continuous zoom inside a container of
/// `size` pixels, with the zoom kept in `[min_zoom, max_zoom]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    /// Viewport with the default `0..=18` zoom range
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center: Self::clamp_center(center),
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = Self::clamp_center(center);
    }

    /// Clamped to the zoom limits
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Also re-clamps the current zoom
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Scale relative to zoom 0
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Half the viewport size, i.e. the container point of the center
    pub fn center_point(&self) -> Point {
        self.size.divide(2.0)
    }

    /// Width of the whole world in pixels at `zoom`
    pub fn world_size(zoom: f64) -> f64 {
        TILE_SIZE * 2_f64.powf(zoom)
    }

    /// Spherical Mercator (EPSG:3857) world pixel of `lat_lng`, at the
    /// current zoom unless `zoom` is given
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let world = Self::world_size(zoom.unwrap_or(self.zoom));
        let sin = lat_lng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().sin();

        Point::new(
            (lat_lng.lng + 180.0) / 360.0 * world,
            (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * world,
        )
    }

    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let world = Self::world_size(zoom.unwrap_or(self.zoom));
        let n = PI * (1.0 - 2.0 * pixel.y / world);

        LatLng::new(n.sinh().atan().to_degrees(), pixel.x / world * 360.0 - 180.0)
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        let origin = self.project(&self.center, None);
        self.project(lat_lng, None)
            .subtract(&origin)
            .add(&self.center_point())
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        let origin = self.project(&self.center, None);
        let projected = point.subtract(&self.center_point()).add(&origin);
        self.unproject(&projected, None)
    }

    /// Moves the map content by the given pixel offset.
    ///
    /// A positive `delta.x` drags the content to the right, so the center
    /// moves west. Returns the offset that was actually applied.
    pub fn pan(&mut self, delta: Point) -> Point {
        let before = self.project(&self.center, None);
        let target = before.subtract(&delta);
        let new_center = self.unproject(&target, None);
        self.set_center(new_center);

        before.subtract(&self.project(&self.center, None))
    }

    /// Geographical extent of the container
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.container_point_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.container_point_to_lat_lng(&self.size);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Latitude only; longitude is free so panning can cross the antimeridian
    fn clamp_center(center: LatLng) -> LatLng {
        LatLng::new(
            center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            center.lng,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_to_mercator_world() {
        let viewport = Viewport::new(LatLng::new(89.0, 200.0), 30.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.zoom, 18.0);
        assert_eq!(viewport.center.lat, MAX_LATITUDE);
        assert_eq!(viewport.center.lng, 200.0);
    }

    #[test]
    fn test_project_known_points() {
        let viewport = Viewport::default();

        let origin = viewport.project(&LatLng::new(0.0, 0.0), Some(0.0));
        assert!(origin.distance_to(&Point::new(128.0, 128.0)) < 1e-9);

        let north_west = viewport.project(&LatLng::new(MAX_LATITUDE, -180.0), Some(1.0));
        assert!(north_west.distance_to(&Point::new(0.0, 0.0)) < 1e-6);
    }

    #[test]
    fn test_coordinate_conversion() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));

        let center_lat_lng = viewport.container_point_to_lat_lng(&Point::new(256.0, 256.0));
        assert!(center_lat_lng.equals_within(&LatLng::new(0.0, 0.0), 1e-9));

        let corner = LatLng::new(20.0, 30.0);
        let pixel = viewport.lat_lng_to_container_point(&corner);
        let back = viewport.container_point_to_lat_lng(&pixel);
        assert!(back.equals_within(&corner, 1e-9));
    }

    #[test]
    fn test_project_doubles_per_zoom_level() {
        let viewport = Viewport::default();
        let ll = LatLng::new(10.0, 45.0);

        let at_3 = viewport.project(&ll, Some(3.0));
        let at_4 = viewport.project(&ll, Some(4.0));
        assert!((at_4.x - at_3.x * 2.0).abs() < 1e-9);
        assert!((at_4.y - at_3.y * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 15.0);
    }

    #[test]
    fn test_pan_moves_center_against_drag() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 5.0, Point::new(600.0, 600.0));

        let applied = viewport.pan(Point::new(-150.0, 0.0));

        assert!((applied.x + 150.0).abs() < 1e-6);
        assert!(viewport.center.lng > 5.0);
        assert!(viewport.center.lat.abs() < 1e-9);
    }

    #[test]
    fn test_bounds_surround_center() {
        let viewport = Viewport::new(LatLng::new(30.0, 10.0), 6.0, Point::new(600.0, 400.0));
        let bounds = viewport.bounds();

        assert!(bounds.contains(&viewport.center));
        assert!(bounds.north_east.lng - bounds.south_west.lng > bounds.north_east.lat - bounds.south_west.lat);
    }
}
