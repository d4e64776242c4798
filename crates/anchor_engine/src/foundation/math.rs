//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by projection, sampling and
//! scaling code.

pub use nalgebra::{
    Matrix2, Matrix4,
    Vector2, Vector3, Vector4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 2x2 matrix type (screen-space Jacobians)
pub type Mat2 = Matrix2<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Extension trait for Mat4 with camera matrix constructors
pub trait Mat4Ext {
    /// Create a perspective projection matrix with depth mapped to [0, 1]
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Flip Y and Z so that view space matches a Y-down screen convention
    fn screen_coordinate_transform() -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // P = [a⁻¹/tan(φ/2)    0              0                    0           ]
        //     [0               1/tan(φ/2)     0                    0           ]
        //     [0               0              f/(f-n)              -nf/(f-n)   ]
        //     [0               0              1                    0           ]
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0; // w = view-space depth
        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn screen_coordinate_transform() -> Mat4 {
        Mat4::new(
            1.0,  0.0,  0.0, 0.0,
            0.0, -1.0,  0.0, 0.0,
            0.0,  0.0, -1.0, 0.0,
            0.0,  0.0,  0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp() {
        assert_relative_eq!(lerp(1.0, 3.0, 0.25), 1.5);
        assert_relative_eq!(lerp(2.0, 0.5, 1.0), 0.5);
    }

    #[test]
    fn test_look_at_puts_target_in_front() {
        // After the view and screen transforms, a point ahead of the camera
        // must have positive depth (Z forward).
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), Vec3::y());
        let flipped = Mat4::screen_coordinate_transform() * view;
        let p = flipped * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_perspective_w_is_view_depth() {
        let proj = Mat4::perspective(60.0_f32.to_radians(), 1.5, 0.1, 100.0);
        let clip = proj * Vec4::new(0.0, 0.0, 7.0, 1.0);
        assert_relative_eq!(clip.w, 7.0, epsilon = 1e-5);
    }
}
