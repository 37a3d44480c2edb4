use crate::math::Mat4;

/// Perspective projection parameters. The ortho bounds are carried along
/// for completeness but the perspective path never reads them.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionSettings {
	pub near_clip: f32,
	pub far_clip: f32,
	/// Vertical field of view, degrees. Valid range (0, 180).
	pub fovy: f32,
	pub aspect: f32,
	pub left: f32,
	pub right: f32,
	pub top: f32,
	pub bottom: f32,
}

impl Default for ProjectionSettings {
	fn default() -> ProjectionSettings {
		ProjectionSettings {
			near_clip: 0.001,
			far_clip: 100.0,
			fovy: 80.0,
			aspect: 1.0,
			left: -1.0,
			right: 1.0,
			top: 1.0,
			bottom: -1.0,
		}
	}
}

impl ProjectionSettings {
	pub fn new(width: u32, height: u32) -> ProjectionSettings {
		let mut settings = ProjectionSettings::default();
		settings.set_viewport(width, height);
		settings
	}

	/// Recomputes the aspect ratio. Callers re-derive the projection matrix
	/// after every viewport change.
	pub fn set_viewport(&mut self, width: u32, height: u32) {
		self.aspect = width as f32 / height as f32;
	}

	/// Symmetric cotangent-based perspective. When aspect >= 1 the
	/// horizontal field of view widens so the vertical extent is preserved,
	/// below 1 it is the vertical that widens.
	pub fn perspective_matrix(&self) -> Mat4 {
		let radian = self.fovy.to_radians();
		let cot = (radian / 2.0).cos() / (radian / 2.0).sin();
		let (first_diag, second_diag) = if self.aspect >= 1.0 {
			(cot / self.aspect, cot)
		} else {
			(cot, cot * self.aspect)
		};
		let depth = self.near_clip - self.far_clip;
		Mat4::from_rows([
			[first_diag, 0.0,         0.0,                                      0.0],
			[0.0,        second_diag, 0.0,                                      0.0],
			[0.0,        0.0,         (self.far_clip + self.near_clip) / depth, 2.0 * self.far_clip * self.near_clip / depth],
			[0.0,        0.0,         -1.0,                                     0.0],
		])
	}
}
