// Camera and viewport handling
//
// The camera sits on the +Z axis looking at the origin. The viewport
// controller keeps the camera's aspect ratio and the draw surface in step
// with the host area whenever it is resized.

use super::Vec3;

/// Vertical field of view in degrees
pub const CAMERA_FOV_DEG: f64 = 75.0;
pub const CAMERA_NEAR: f64 = 0.1;
pub const CAMERA_FAR: f64 = 1000.0;
/// Distance of the eye from the origin along +Z
pub const CAMERA_DISTANCE: f64 = 50.0;

/// A point after projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Normalised device coordinates, visible range -1.0 ~ 1.0
    pub x: f64,
    pub y: f64,
    /// Distance in front of the eye
    pub depth: f64,
}

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub distance: f64,
    /// Cached `1 / tan(fov / 2)`, refreshed by `update_projection`
    focal: f64,
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f64, aspect: f64, near: f64, far: f64, distance: f64) -> Self {
        let mut camera = Self {
            fov_deg,
            aspect,
            near,
            far,
            distance,
            focal: 1.0,
        };
        camera.update_projection();
        camera
    }

    /// Recompute derived projection terms after changing fov or aspect
    pub fn update_projection(&mut self) {
        self.focal = 1.0 / (self.fov_deg.to_radians() / 2.0).tan();
    }

    /// Project a world-space point
    ///
    /// Returns `None` for points outside the near/far range. Points beyond
    /// the side planes are still returned; the canvas clips them.
    pub fn project(&self, point: Vec3) -> Option<Projected> {
        let depth = self.distance - point.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        Some(Projected {
            x: point.x * self.focal / (depth * self.aspect),
            y: point.y * self.focal / depth,
            depth,
        })
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(
            CAMERA_FOV_DEG,
            1.0,
            CAMERA_NEAR,
            CAMERA_FAR,
            CAMERA_DISTANCE,
        )
    }
}

/// Pixel dimensions of the draw target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawSurface {
    pub width: u32,
    pub height: u32,
}

/// Keeps camera aspect and draw surface matched to the host area
#[derive(Debug)]
pub struct ViewportController {
    camera: PerspectiveCamera,
    surface: Option<DrawSurface>,
}

impl ViewportController {
    /// Create a viewport for an initial host size
    pub fn new(width: u32, height: u32) -> Self {
        let mut viewport = Self {
            camera: PerspectiveCamera::default(),
            surface: Some(DrawSurface::default()),
        };
        viewport.on_resize(width, height);
        viewport
    }

    /// Handle a host resize
    ///
    /// Sets `aspect = width / height`, refreshes the projection and resizes
    /// the surface. Zero-sized areas (minimised or collapsed panels) are
    /// ignored. Returns whether anything changed.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "Ignoring zero-sized viewport");
            return false;
        }
        if surface.width == width && surface.height == height {
            return false;
        }

        self.camera.aspect = width as f64 / height as f64;
        self.camera.update_projection();
        surface.width = width;
        surface.height = height;
        tracing::debug!(
            width,
            height,
            aspect = self.camera.aspect,
            "Viewport resized"
        );
        true
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Current surface, `None` after release
    pub fn surface(&self) -> Option<DrawSurface> {
        self.surface
    }

    /// Drop the draw surface at teardown. Returns false if already released.
    pub fn release(&mut self) -> bool {
        self.surface.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_origin_projects_to_centre() {
        let camera = PerspectiveCamera::default();
        let p = camera.project(Vec3::default()).unwrap();
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.depth, CAMERA_DISTANCE);
    }

    #[test]
    fn test_point_behind_camera_is_culled() {
        let camera = PerspectiveCamera::default();
        assert!(camera.project(Vec3::new(0.0, 0.0, 60.0)).is_none());
        assert!(camera.project(Vec3::new(0.0, 0.0, -2000.0)).is_none());
    }

    #[test]
    fn test_default_regions_fit_in_view() {
        // Outermost proxy corner of the default layout
        let camera = PerspectiveCamera::default();
        let p = camera.project(Vec3::new(25.25, 15.25, 0.0)).unwrap();
        assert!(p.x.abs() < 1.0);
        assert!(p.y.abs() < 1.0);
    }

    #[test]
    fn test_zero_resize_ignored() {
        let mut viewport = ViewportController::new(200, 100);
        assert!(!viewport.on_resize(0, 100));
        assert!(!viewport.on_resize(100, 0));
        assert_eq!(viewport.camera().aspect, 2.0);
        assert_eq!(
            viewport.surface().map(|s| (s.width, s.height)),
            Some((200, 100))
        );
    }

    #[test]
    fn test_same_size_is_no_change() {
        let mut viewport = ViewportController::new(200, 100);
        assert!(!viewport.on_resize(200, 100));
    }

    #[test]
    fn test_release_surface_once() {
        let mut viewport = ViewportController::new(80, 40);
        assert!(viewport.release());
        assert!(!viewport.release());
        assert!(viewport.surface().is_none());
        assert!(!viewport.on_resize(100, 50));
    }

    #[test]
    fn test_wider_aspect_narrows_horizontal_projection() {
        let mut viewport = ViewportController::new(100, 100);
        let point = Vec3::new(10.0, 0.0, 0.0);
        let square = viewport.camera().project(point).unwrap();
        viewport.on_resize(200, 100);
        let wide = viewport.camera().project(point).unwrap();
        assert!((wide.x - square.x / 2.0).abs() < 1e-12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// After any resize the aspect ratio is exactly width / height
        #[test]
        fn prop_resize_sets_exact_aspect(
            width in 1u32..10000,
            height in 1u32..10000,
        ) {
            let mut viewport = ViewportController::new(640, 480);
            viewport.on_resize(width, height);
            prop_assert_eq!(viewport.camera().aspect, width as f64 / height as f64);
            prop_assert_eq!(viewport.surface(), Some(DrawSurface { width, height }));
        }
    }
}
