// Activation color mapping
//
// Blue -> yellow -> red ramp used to tint neuron proxies.

use super::Rgb;

/// Scale from activation to self-illumination strength
pub const INTENSITY_SCALE: f64 = 0.8;

/// Display color and self-illumination strength for one activation value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationColor {
    pub color: Rgb,
    pub intensity: f64,
}

/// Map an activation to its display color and intensity
///
/// - Below 0.5: `t = 2a`, color `(t, t, 1 - t)` (blue towards yellow)
/// - Otherwise: `t = 2(a - 0.5)`, color `(1, 1 - t, 0)` (yellow towards red)
/// - Intensity is `0.8a` in both halves
///
/// # Preconditions
/// `activation` is expected in `[0, 1]`. Values outside are not clamped and
/// yield out-of-range channels; the caller owns validation.
pub fn map_activation(activation: f64) -> ActivationColor {
    let color = if activation < 0.5 {
        let t = activation * 2.0;
        Rgb::new(t, t, 1.0 - t)
    } else {
        let t = (activation - 0.5) * 2.0;
        Rgb::new(1.0, 1.0 - t, 0.0)
    };

    ActivationColor {
        color,
        intensity: activation * INTENSITY_SCALE,
    }
}
