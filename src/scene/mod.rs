// Retained scene module
//
// A small scene graph: a flat arena of sphere meshes with
// Phong-style materials, a perspective camera and a draw surface. The
// entity pool allocates into the arena once; the render loop only reads it.

pub mod camera;
pub mod color;
pub mod pool;
pub mod render_loop;

pub use camera::ViewportController;
pub use pool::{EntityPool, Region};
pub use render_loop::RenderLoop;

/// A point or direction in scene space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Rotate around the Y axis by `angle` radians (right-handed)
    pub fn rotate_y(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Linear RGB color with channels nominally in 0.0 ~ 1.0
///
/// Channels are not clamped on construction: out-of-range activations are
/// allowed to produce out-of-range colors, clamping happens at rasterisation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a 0xRRGGBB literal
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f64 / 255.0,
            g: ((hex >> 8) & 0xff) as f64 / 255.0,
            b: (hex & 0xff) as f64 / 255.0,
        }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Largest per-channel difference between two colors
    #[cfg(test)]
    pub fn distance(self, other: Rgb) -> f64 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }

    /// Quantise to 8-bit channels, clamping to the displayable range
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

impl std::ops::Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

/// Surface color plus a separate self-illumination channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f64,
}

impl Material {
    /// Shaded color as seen under the scene's flat ambient light
    pub fn shade(&self, ambient: f64) -> Rgb {
        self.color.scale(ambient) + self.emissive.scale(self.emissive_intensity)
    }
}

/// A sphere placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub position: Vec3,
    pub radius: f64,
    pub material: Material,
}

/// Index of a mesh slot in the scene arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(usize);

/// Arena of meshes
///
/// Slots are never reused: releasing a handle empties its slot for good, so a
/// handle is released at most once.
#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<Option<Mesh>>,
    released: usize,
}

impl Scene {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            meshes: Vec::with_capacity(capacity),
            released: 0,
        }
    }

    pub fn add(&mut self, mesh: Mesh) -> MeshHandle {
        self.meshes.push(Some(mesh));
        MeshHandle(self.meshes.len() - 1)
    }

    #[cfg(test)]
    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, handle: MeshHandle) -> Option<&mut Mesh> {
        self.meshes.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Release a mesh. Returns false if it was already released.
    pub fn release(&mut self, handle: MeshHandle) -> bool {
        match self.meshes.get_mut(handle.0).and_then(Option::take) {
            Some(_) => {
                self.released += 1;
                true
            }
            None => false,
        }
    }

    /// Meshes still alive, in allocation order
    pub fn live(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().filter_map(Option::as_ref)
    }

    pub fn live_count(&self) -> usize {
        self.meshes.len() - self.released
    }

    #[cfg(test)]
    pub fn released_count(&self) -> usize {
        self.released
    }
}
