use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector4};

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::config::Settings;
use crate::gfx::math::{transform_point, transform_vector, Mat4, Vec3};
use crate::Real;

/// Camera translation applied by [`EditorCamera::reset_position`]
pub const DEFAULT_POSITION: [Real; 3] = [0.0, -2.0, -2.0];
/// Pitch applied by [`EditorCamera::reset_position`]
pub const DEFAULT_ANGLE_X: Real = 20.0;

/// Fixed viewpoints offered by the editor toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    Default,
    Front,
    Right,
    Back,
    Left,
    Top,
    Bottom,
}

impl CameraPreset {
    /// Translation, pitch and yaw for this preset
    pub fn placement(self) -> (Vec3, Real, Real) {
        let side = Vec3::new(0.0, 0.0, -4.0);
        match self {
            CameraPreset::Default => (Vec3::from(DEFAULT_POSITION), DEFAULT_ANGLE_X, 0.0),
            CameraPreset::Front => (side, 0.0, 0.0),
            CameraPreset::Right => (side, 0.0, -90.0),
            CameraPreset::Back => (side, 0.0, 180.0),
            CameraPreset::Left => (side, 0.0, 90.0),
            CameraPreset::Top => (side, 90.0, 0.0),
            CameraPreset::Bottom => (side, -90.0, 0.0),
        }
    }
}

/// The viewport camera.
///
/// The world is moved in front of a fixed eye: the view matrix ("face
/// matrix") is `Rx(face_x) * Ry(face_y) * T(pos) * Rx(angle_x) * Ry(angle_y)`,
/// so `pos` is the translation of the world rather than the eye position.
/// Use [`EditorCamera::eye`] for the latter.
#[derive(Debug, Clone)]
pub struct EditorCamera {
    pub pos: Vec3,
    pub angle_x: Real,
    pub angle_y: Real,
    pub face_x: Real,
    pub face_y: Real,
    pub face_mat: Mat4,
    pub width: u32,
    pub height: u32,
    pub fovy: Real,
    pub znear: Real,
    pub zfar: Real,
    pub uniform: CameraUniform,
}

impl Camera for EditorCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<Real> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl EditorCamera {
    pub fn new(width: u32, height: u32, settings: &Settings) -> Self {
        let mut camera = Self {
            pos: Vec3::from(DEFAULT_POSITION),
            angle_x: DEFAULT_ANGLE_X,
            angle_y: 0.0,
            face_x: 0.0,
            face_y: 0.0,
            face_mat: Mat4::identity(),
            width,
            height,
            fovy: settings.fovy,
            znear: settings.znear,
            zfar: settings.zfar,
            uniform: CameraUniform::default(),
        };
        camera.reset_position();
        camera
    }

    /// Rebuilds the face matrix from translation and angles
    pub fn update(&mut self) {
        self.face_mat = Matrix4::from_angle_x(Deg(self.face_x))
            * Matrix4::from_angle_y(Deg(self.face_y))
            * Matrix4::from_translation(self.pos)
            * Matrix4::from_angle_x(Deg(self.angle_x))
            * Matrix4::from_angle_y(Deg(self.angle_y));
        self.update_view_proj();
    }

    /// Points the camera at `center` from the orbit position implied by
    /// `pos` and the orbit angles
    pub fn look_at(&mut self, center: Vec3) {
        let orbit = Matrix4::from_angle_y(Deg(-self.angle_y)) * Matrix4::from_angle_x(Deg(-self.angle_x));
        let eye = transform_point(&orbit, -self.pos);
        self.face_mat = Matrix4::look_at_rh(
            Point3::from_vec(eye),
            Point3::from_vec(center),
            Vec3::unit_y(),
        );
        self.update_view_proj();
    }

    /// Look at `focus` when given, otherwise rebuild the free view
    pub fn refresh(&mut self, focus: Option<Vec3>) {
        match focus {
            Some(center) => self.look_at(center),
            None => self.update(),
        }
    }

    pub fn move_to(&mut self, pos: Vec3, angle_x: Real, angle_y: Real) {
        self.pos = pos;
        self.angle_x = angle_x;
        self.angle_y = angle_y;
        self.face_mat = Mat4::identity();
        self.face_x = 0.0;
        self.face_y = 0.0;
        self.update();
    }

    pub fn move_to_preset(&mut self, preset: CameraPreset) {
        let (pos, angle_x, angle_y) = preset.placement();
        self.move_to(pos, angle_x, angle_y);
    }

    pub fn reset_position(&mut self) {
        self.move_to_preset(CameraPreset::Default);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.update_view_proj();
    }

    pub fn aspect(&self) -> Real {
        self.width.max(1) as Real / self.height.max(1) as Real
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.face_mat
    }

    pub fn projection_matrix(&self) -> Mat4 {
        perspective(Deg(self.fovy), self.aspect(), self.znear, self.zfar)
    }

    /// World-space eye position
    pub fn eye(&self) -> Vec3 {
        let inverse = self.face_mat.invert().unwrap_or_else(Mat4::identity);
        transform_point(&inverse, Vec3::new(0.0, 0.0, 0.0))
    }

    /// World-space viewing direction
    pub fn forward(&self) -> Vec3 {
        let inverse = self.face_mat.invert().unwrap_or_else(Mat4::identity);
        transform_vector(&inverse, -Vec3::unit_z()).normalize()
    }

    /// Window coordinates of a world point: x to the right, y upwards from
    /// the bottom edge, z the depth in [0, 1]
    pub fn project(&self, point: Vec3) -> Vec3 {
        let clip = self.build_view_projection_matrix() * Vector4::new(point.x, point.y, point.z, 1.0);
        let ndc = if clip.w != 0.0 {
            clip.truncate() / clip.w
        } else {
            clip.truncate()
        };
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.width as Real,
            (ndc.y + 1.0) * 0.5 * self.height as Real,
            (ndc.z + 1.0) * 0.5,
        )
    }

    pub fn update_view_proj(&mut self) {
        let eye = self.eye();
        self.uniform.view_position = [eye.x as f32, eye.y as f32, eye.z as f32, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).magnitude() < 1e-9
    }

    #[test]
    fn test_front_preset_eye_sits_on_positive_z() {
        let mut camera = EditorCamera::new(800, 600, &Settings::default());
        camera.move_to_preset(CameraPreset::Front);
        assert!(approx(camera.eye(), Vec3::new(0.0, 0.0, 4.0)));
        assert!(approx(camera.forward(), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_project_centre_of_view() {
        let mut camera = EditorCamera::new(800, 600, &Settings::default());
        camera.move_to_preset(CameraPreset::Front);
        let p = camera.project(Vec3::new(0.0, 0.0, 0.0));
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn test_look_at_faces_the_target() {
        let mut camera = EditorCamera::new(800, 600, &Settings::default());
        let target = Vec3::new(0.5, 0.0, 0.0);
        camera.look_at(target);
        let to_target = (target - camera.eye()).normalize();
        assert!(approx(camera.forward(), to_target));
    }

    #[test]
    fn test_move_to_resets_face_rotation() {
        let mut camera = EditorCamera::new(800, 600, &Settings::default());
        camera.face_x = 12.0;
        camera.face_y = -3.0;
        camera.reset_position();
        assert_eq!(camera.face_x, 0.0);
        assert_eq!(camera.face_y, 0.0);
        assert_eq!(camera.angle_x, DEFAULT_ANGLE_X);
    }
}
