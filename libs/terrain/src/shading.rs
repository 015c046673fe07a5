use glam::{Mat3, Mat4, Vec3};

/// Per-chunk uniforms for the shading backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkShading {
    model: Mat4,
    normal_matrix: Mat3,
    pub color: Vec3,
}

impl Default for ChunkShading {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::new(0.105, 0.713, 0.227))
    }
}

impl ChunkShading {
    pub fn new(model: Mat4, color: Vec3) -> Self {
        Self {
            model,
            normal_matrix: normal_matrix(model),
            color,
        }
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn normal_matrix(&self) -> Mat3 {
        self.normal_matrix
    }

    /// Replaces the model transform and refreshes the normal matrix with it.
    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
        self.normal_matrix = normal_matrix(model);
    }

    /// Model-space point to world space.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.model.transform_point3(local)
    }

    /// World-space point to the chunk's local frame. Assumes an invertible
    /// model.
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.model.inverse().transform_point3(world)
    }
}

/// Inverse-transpose of the model's linear part. Falls back to identity when
/// the model is singular.
pub fn normal_matrix(model: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(model);
    if linear.determinant().abs() <= f32::EPSILON {
        return Mat3::IDENTITY;
    }
    linear.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn approx(a: Mat3, b: Mat3) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_identity_model() {
        let shading = ChunkShading::default();
        assert_eq!(shading.normal_matrix(), Mat3::IDENTITY);
        assert_eq!(shading.color, Vec3::new(0.105, 0.713, 0.227));
    }

    #[test]
    fn test_rotation_and_translation_keep_rotation() {
        let rot = Quat::from_rotation_y(0.6);
        let model = Mat4::from_rotation_translation(rot, Vec3::new(10.0, -2.0, 3.0));
        let m = normal_matrix(model);
        assert!(approx(m, Mat3::from_quat(rot)));
    }

    #[test]
    fn test_non_uniform_scale_keeps_normals_perpendicular() {
        let model = Mat4::from_scale(Vec3::new(4.0, 1.0, 0.5));
        let m = normal_matrix(model);
        // Plane x + y = 0: tangent (1, -1, 0), normal (1, 1, 0).
        let tangent = Mat3::from_mat4(model) * Vec3::new(1.0, -1.0, 0.0);
        let normal = m * Vec3::new(1.0, 1.0, 0.0);
        assert!(tangent.dot(normal).abs() < 1e-5);
    }

    #[test]
    fn test_set_model_recomputes_normal_matrix() {
        let mut shading = ChunkShading::default();
        shading.set_model(Mat4::from_scale(Vec3::splat(2.0)));
        assert!(approx(shading.normal_matrix(), Mat3::from_diagonal(Vec3::splat(0.5))));
        shading.set_model(Mat4::IDENTITY);
        assert!(approx(shading.normal_matrix(), Mat3::IDENTITY));
    }

    #[test]
    fn test_singular_model_falls_back_to_identity() {
        let m = normal_matrix(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));
        assert_eq!(m, Mat3::IDENTITY);
    }

    #[test]
    fn test_world_local_round_trip() {
        let mut shading = ChunkShading::default();
        shading.set_model(Mat4::from_translation(Vec3::new(64.0, 0.0, -32.0)));
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!((shading.to_local(shading.to_world(p)) - p).length() < 1e-5);
    }
}
