pub mod camera_controller;
pub mod camera_utils;
pub mod editor_camera;

// Re-export main types
pub use camera_controller::CameraController;
pub use camera_utils::{Camera, CameraUniform};
pub use editor_camera::{CameraPreset, EditorCamera};
