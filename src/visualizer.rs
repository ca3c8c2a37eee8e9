//! Spectrum-to-geometry mapping for the ring visualizer.
//!
//! Each frame the spectrum is traversed twice around a half circle, once
//! from 0 degrees down to -180 and once from 0 up to +180. Both sweeps
//! include their endpoints, so the points at 0 and +/-180 degrees are
//! emitted twice; that matches the drawing order this renders faithfully
//! and is not worth "fixing".

use crate::analyzer::SpectrumFrame;

/// Number of points around the full ring; the angular step is `360 / RING_POINTS`.
pub const RING_POINTS: usize = 180;

/// Magnitudes are scaled by this factor before they displace a point.
const SPECTRUM_SCALE: f32 = 0.3;

/// One colored point of the ring, in the caller's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPoint {
    pub x: f64,
    pub y: f64,
    pub color: (u8, u8, u8),
}

/// Map the spectrum onto a ring of colored points around `center`.
///
/// A louder bin pushes its point radially outward and shifts its color from
/// white toward magenta. An all-zero spectrum degenerates to a plain circle
/// of white points at `radius`.
pub fn ring_points(spectrum: &SpectrumFrame, center: (f64, f64), radius: f64) -> Vec<RingPoint> {
    // The sweeps index bins by unsigned angle, so the frame must cover 0..=180.
    debug_assert!(spectrum.len() > RING_POINTS);

    let step = (360 / RING_POINTS) as i32;
    let mut points = Vec::with_capacity(2 * (RING_POINTS / 2 + 1));

    // Lower half: 0 down to -180 degrees, endpoints included.
    let mut degrees = 0i32;
    while degrees >= -180 {
        points.push(point_at(spectrum, center, radius, degrees));
        degrees -= step;
    }

    // Upper half: 0 up to +180 degrees, endpoints included.
    let mut degrees = 0i32;
    while degrees <= 180 {
        points.push(point_at(spectrum, center, radius, degrees));
        degrees += step;
    }

    points
}

fn point_at(
    spectrum: &SpectrumFrame,
    (center_x, center_y): (f64, f64),
    radius: f64,
    degrees: i32,
) -> RingPoint {
    // The bin index is the unsigned angle; both sweeps read the same bins.
    let bin = degrees.unsigned_abs() as usize;
    let value = spectrum.magnitude(bin) * SPECTRUM_SCALE;

    // Angles are in degrees throughout; convert only at the trig call.
    let theta = f64::from(degrees).to_radians();
    let reach = radius + f64::from(value);

    RingPoint {
        x: center_x + theta.cos() * reach,
        y: center_y + theta.sin() * reach,
        color: point_color(value),
    }
}

/// Red and blue stay saturated; the green channel fades with loudness, going
/// from white at zero to magenta at a scaled magnitude of 15 and beyond.
fn point_color(scaled: f32) -> (u8, u8, u8) {
    let green = map_range(scaled, 0.0, 15.0, 255.0, 0.0);
    (255, green.round() as u8, 255)
}

/// Linearly map `value` from the input range to the output range, clamped to
/// the output bounds.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let t = ((value - in_min) / (in_max - in_min)).clamp(0.0, 1.0);
    out_min + (out_max - out_min) * t
}
