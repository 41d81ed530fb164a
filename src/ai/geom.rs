use glam::{Quat, Vec3};

/// Wrap an angle in degrees into [0, 360).
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// World heading (yaw in degrees, 0 = +Z, 90 = +X) of a direction.
/// Height is ignored.
pub fn heading_of(direction: Vec3) -> f32 {
    wrap_degrees(direction.x.atan2(direction.z).to_degrees())
}

/// Unit direction on the ground plane for a world heading in degrees.
pub fn direction_of(heading: f32) -> Vec3 {
    let rad = heading.to_radians();
    Vec3::new(rad.sin(), 0.0, rad.cos())
}

/// Unsigned angle in degrees between two vectors. Zero when either is degenerate.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    if a.length_squared() < 1e-10 || b.length_squared() < 1e-10 {
        return 0.0;
    }
    let cos = a.normalize().dot(b.normalize()).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Distance on the ground plane.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Express `point` in the local frame of an upright body at `origin`
/// facing `heading` with uniform `scale`.
pub fn to_local(origin: Vec3, heading: f32, scale: f32, point: Vec3) -> Vec3 {
    let inverse = Quat::from_rotation_y(heading.to_radians()).inverse();
    let local = inverse * (point - origin);
    if scale.abs() > f32::EPSILON {
        local / scale
    } else {
        local
    }
}

/// Shortest signed difference `to - from` in degrees, in (-180, 180].
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    let d = wrap_degrees(to - from);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Uniform float in [min, max). Returns `min` when the range is empty.
pub fn range_f32(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + rng.f32() * (max - min)
}
