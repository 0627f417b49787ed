//! Matrix helpers shared by the mesh, skeleton and animation stages

use glam::{DMat3, DMat4, DQuat, DVec3};

/// Remove the scale baked into a transform so it cannot leak into skin space.
///
/// The matrix is pre-multiplied by the inverse of its own scale, so scale
/// inherited from ancestors is taken out of the translation as well. Zero
/// scale components are left alone (there is nothing to invert).
pub fn neutralize_scale(m: DMat4) -> DMat4 {
    let (scale, _, _) = m.to_scale_rotation_translation();
    let inverse = DVec3::new(
        invert_or_one(scale.x),
        invert_or_one(scale.y),
        invert_or_one(scale.z),
    );
    DMat4::from_scale(inverse) * m
}

fn invert_or_one(v: f64) -> f64 {
    if v == 0.0 || !v.is_finite() {
        1.0
    } else {
        1.0 / v
    }
}

/// Translation and rotation of a (scale-free) transform.
///
/// A transform with a collapsed axis has no well-defined decomposition; its
/// rotation is rebuilt from the remaining axes, or is the identity when fewer
/// than two survive.
pub fn translation_rotation(m: DMat4) -> (DVec3, DQuat) {
    let (_, rotation, translation) = m.to_scale_rotation_translation();
    if rotation.is_finite() {
        return (translation, rotation.normalize());
    }

    let rotation = rotation_from_axes(m).unwrap_or_else(|| {
        tracing::warn!("Transform has zero scale on two or more axes, using identity rotation");
        DQuat::IDENTITY
    });
    (translation, rotation)
}

fn rotation_from_axes(m: DMat4) -> Option<DQuat> {
    let x = m.x_axis.truncate().try_normalize();
    let y = m.y_axis.truncate().try_normalize();
    let z = m.z_axis.truncate().try_normalize();

    let (x, y, z) = match (x, y, z) {
        (Some(x), Some(y), None) => (x, y, x.cross(y).try_normalize()?),
        (Some(x), None, Some(z)) => (x, z.cross(x).try_normalize()?, z),
        (None, Some(y), Some(z)) => (y.cross(z).try_normalize()?, y, z),
        _ => return None,
    };
    Some(DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize())
}
