// Neuron proxy pool
//
// Owns one sphere mesh per simulated neuron, laid out once into per-region
// grids. After construction only material colors change; proxies are never
// added, removed or moved.

use super::color::map_activation;
use super::{Material, Mesh, MeshHandle, Rgb, Scene, Vec3};

/// Distance between neighbouring grid cells before the half-scale
pub const GRID_SPACING: f64 = 1.5;

/// Sphere radius of a proxy
pub const PROXY_RADIUS: f64 = 0.3;

/// Emissive strength before any activation data has arrived
pub const INITIAL_EMISSIVE_INTENSITY: f64 = 0.2;

/// A named, spatially grouped set of neurons
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub base_color: Rgb,
    pub neuron_count: usize,
    pub origin: Vec3,
}

/// Persistent visual stand-in for one neuron
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeuronProxy {
    pub region_index: usize,
    /// Dense index into the region's activation array
    pub index_in_region: usize,
    pub base_color: Rgb,
    pub handle: MeshHandle,
}

/// Offset of grid cell `index` from its region origin
///
/// `columns = ceil(sqrt(count))`; the grid is centred on the origin and then
/// halved, so a 256-neuron region spans roughly 12 x 12 scene units.
pub fn grid_offset(index: usize, count: usize) -> Vec3 {
    let columns = (count as f64).sqrt().ceil() as usize;
    if columns == 0 {
        return Vec3::default();
    }
    let half_extent = columns as f64 * GRID_SPACING / 2.0;
    let x = (index % columns) as f64 * GRID_SPACING - half_extent;
    let y = (index / columns) as f64 * GRID_SPACING - half_extent;
    Vec3::new(x / 2.0, y / 2.0, 0.0)
}

/// Fixed population of neuron proxies
#[derive(Debug)]
pub struct EntityPool {
    regions: Vec<Region>,
    proxies: Vec<NeuronProxy>,
    scene: Scene,
    disposed: bool,
}

impl EntityPool {
    /// Allocate and lay out every proxy for `regions`
    pub fn new(regions: &[Region]) -> Self {
        let total: usize = regions.iter().map(|r| r.neuron_count).sum();
        let mut scene = Scene::with_capacity(total);
        let mut proxies = Vec::with_capacity(total);

        for (region_index, region) in regions.iter().enumerate() {
            for i in 0..region.neuron_count {
                let handle = scene.add(Mesh {
                    position: region.origin + grid_offset(i, region.neuron_count),
                    radius: PROXY_RADIUS,
                    material: Material {
                        color: region.base_color,
                        emissive: region.base_color,
                        emissive_intensity: INITIAL_EMISSIVE_INTENSITY,
                    },
                });
                proxies.push(NeuronProxy {
                    region_index,
                    index_in_region: i,
                    base_color: region.base_color,
                    handle,
                });
            }
        }

        tracing::debug!(
            regions = regions.len(),
            proxies = proxies.len(),
            "Neuron pool allocated"
        );

        Self {
            regions: regions.to_vec(),
            proxies,
            scene,
            disposed: false,
        }
    }

    /// Recolor every proxy that has a matching activation slot
    ///
    /// `activations[r][i]` drives proxy `i` of region `r`. A missing region
    /// array or a slot past the end of one leaves that proxy as it was.
    /// Returns the number of proxies updated.
    pub fn apply_activations(&mut self, activations: &[&[f64]]) -> usize {
        let mut updated = 0;

        for proxy in &self.proxies {
            let Some(value) = activations
                .get(proxy.region_index)
                .and_then(|values| values.get(proxy.index_in_region))
            else {
                continue;
            };

            if let Some(mesh) = self.scene.get_mut(proxy.handle) {
                let mapped = map_activation(*value);
                mesh.material.color = mapped.color;
                mesh.material.emissive = mapped.color;
                mesh.material.emissive_intensity = mapped.intensity;
                updated += 1;
            }
        }

        tracing::trace!(updated, "Applied activations to neuron pool");
        updated
    }

    /// Release every mesh. Only the first call releases anything.
    pub fn dispose(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;

        let released = self
            .proxies
            .iter()
            .filter(|proxy| self.scene.release(proxy.handle))
            .count();
        tracing::debug!(
            released,
            live = self.scene.live_count(),
            "Neuron pool disposed"
        );
        released
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    #[cfg(test)]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[cfg(test)]
    pub fn proxies(&self) -> &[NeuronProxy] {
        &self.proxies
    }

    /// Read-only view of the mesh arena
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current material of a proxy, `None` once disposed
    #[cfg(test)]
    pub fn material(&self, proxy: &NeuronProxy) -> Option<&Material> {
        self.scene.get(proxy.handle).map(|mesh| &mesh.material)
    }

    /// Proxy `index_in_region` of region `region_index`
    #[cfg(test)]
    pub fn proxy(&self, region_index: usize, index_in_region: usize) -> Option<&NeuronProxy> {
        let key = (region_index, index_in_region);
        self.proxies
            .iter()
            .find(|p| (p.region_index, p.index_in_region) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::brain_regions;
    use crate::scene::color::map_activation;
    use proptest::prelude::*;

    fn region(count: usize) -> Region {
        Region {
            name: "Test",
            base_color: Rgb::from_hex(0x3b82f6),
            neuron_count: count,
            origin: Vec3::new(0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_default_regions_allocate_1024_proxies() {
        let pool = EntityPool::new(&brain_regions());
        assert_eq!(pool.len(), 1024);
        assert_eq!(pool.scene().live_count(), 1024);
        assert_eq!(pool.regions().len(), 4);
    }

    #[test]
    fn test_grid_offset_layout() {
        // 256 neurons -> 16 columns, half extent 12
        assert_eq!(grid_offset(0, 256), Vec3::new(-6.0, -6.0, 0.0));
        assert_eq!(grid_offset(1, 256), Vec3::new(-5.25, -6.0, 0.0));
        assert_eq!(grid_offset(16, 256), Vec3::new(-6.0, -5.25, 0.0));
        assert_eq!(grid_offset(255, 256), Vec3::new(5.25, 5.25, 0.0));
    }

    #[test]
    fn test_grid_offset_non_square_count() {
        // 10 neurons -> 4 columns, half extent 3
        assert_eq!(grid_offset(5, 10), Vec3::new(-0.75, -0.75, 0.0));
    }

    #[test]
    fn test_positions_include_region_origin() {
        let pool = EntityPool::new(&brain_regions());
        let proxy = pool.proxy(1, 0).unwrap();
        let mesh = pool.scene().get(proxy.handle).unwrap();
        assert_eq!(mesh.position, Vec3::new(14.0, 4.0, 0.0));
    }

    #[test]
    fn test_initial_material_is_region_color() {
        let pool = EntityPool::new(&brain_regions());
        for proxy in pool.proxies() {
            let material = pool.material(proxy).unwrap();
            assert_eq!(material.color, proxy.base_color);
            assert_eq!(material.emissive, proxy.base_color);
            assert_eq!(material.emissive_intensity, INITIAL_EMISSIVE_INTENSITY);
        }
    }

    #[test]
    fn test_apply_short_array_updates_prefix_only() {
        let mut pool = EntityPool::new(&brain_regions());
        let encoder: &[f64] = &[0.0, 0.25, 1.0];
        let updated = pool.apply_activations(&[encoder]);
        assert_eq!(updated, 3);

        for (i, value) in [0.0, 0.25, 1.0].into_iter().enumerate() {
            let material = pool.material(pool.proxy(0, i).unwrap()).unwrap();
            let expected = map_activation(value);
            assert_eq!(material.color, expected.color);
            assert_eq!(material.emissive, expected.color);
            assert_eq!(material.emissive_intensity, expected.intensity);
        }

        // Slot 3 onwards and the other regions keep their base look
        let rest = pool
            .proxies()
            .iter()
            .filter(|p| p.region_index != 0 || p.index_in_region >= 3);
        for proxy in rest {
            let material = pool.material(proxy).unwrap();
            assert_eq!(material.color, proxy.base_color);
            assert_eq!(material.emissive_intensity, INITIAL_EMISSIVE_INTENSITY);
        }
    }

    #[test]
    fn test_missing_data_keeps_last_rendered_appearance() {
        let mut pool = EntityPool::new(&brain_regions());
        let full = vec![1.0; 256];
        pool.apply_activations(&[&full]);

        // Next cycle only has two slots: the rest stays red rather than
        // dropping to zero activation
        pool.apply_activations(&[&[0.0, 0.0]]);
        let untouched = pool.material(pool.proxy(0, 2).unwrap()).unwrap();
        assert_eq!(untouched.color, Rgb::new(1.0, 0.0, 0.0));
        let refreshed = pool.material(pool.proxy(0, 1).unwrap()).unwrap();
        assert_eq!(refreshed.color, Rgb::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_empty_activation_set_updates_nothing() {
        let mut pool = EntityPool::new(&brain_regions());
        assert_eq!(pool.apply_activations(&[]), 0);
        let empty: &[f64] = &[];
        assert_eq!(pool.apply_activations(&[empty, empty, empty, empty]), 0);
    }

    #[test]
    fn test_dispose_releases_each_mesh_once() {
        let mut pool = EntityPool::new(&brain_regions());
        assert_eq!(pool.dispose(), 1024);
        assert!(pool.is_disposed());
        assert_eq!(pool.dispose(), 0);
        assert_eq!(pool.scene().live_count(), 0);
        assert_eq!(pool.scene().released_count(), 1024);
        // Proxy bookkeeping survives teardown
        assert_eq!(pool.len(), 1024);
    }

    #[test]
    fn test_apply_after_dispose_is_harmless() {
        let mut pool = EntityPool::new(&brain_regions());
        pool.dispose();
        assert_eq!(pool.apply_activations(&[&[0.5]]), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Pool size is the sum of region counts and applying data never
        /// changes it
        #[test]
        fn prop_pool_size_is_fixed(
            counts in proptest::collection::vec(0usize..300, 1..6),
            values in proptest::collection::vec(0.0f64..=1.0, 0..400),
        ) {
            let regions: Vec<Region> = counts.iter().map(|&c| region(c)).collect();
            let expected: usize = counts.iter().sum();
            let mut pool = EntityPool::new(&regions);
            prop_assert_eq!(pool.len(), expected);

            let arrays: Vec<&[f64]> = counts.iter().map(|_| values.as_slice()).collect();
            let updated = pool.apply_activations(&arrays);
            let expected_updates: usize = counts.iter().map(|&c| c.min(values.len())).sum();
            prop_assert_eq!(updated, expected_updates);
            prop_assert_eq!(pool.len(), expected);
            prop_assert_eq!(pool.scene().live_count(), expected);
        }

        /// Every proxy index is dense and unique within its region
        #[test]
        fn prop_indices_dense(count in 0usize..600) {
            let pool = EntityPool::new(&[region(count)]);
            for (i, proxy) in pool.proxies().iter().enumerate() {
                prop_assert_eq!(proxy.index_in_region, i);
                prop_assert_eq!(proxy.region_index, 0);
            }
        }
    }
}
