use glam::Vec3;

use crate::math::Mat4;

/// Look-at camera. Preconditions, not checked: `position != center`, and
/// `up` must not be parallel to the view direction.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
	pub position: Vec3,
	pub center: Vec3,
	pub up: Vec3,
}

impl Default for Camera {
	fn default() -> Camera {
		Camera {
			position: Vec3::new(0.0, 0.0, 2.0),
			center: Vec3::ZERO,
			up: Vec3::new(0.0, 1.0, 0.0),
		}
	}
}

impl Camera {
	pub fn new(position: Vec3, center: Vec3, up: Vec3) -> Camera {
		Camera { position, center, up }
	}

	/// Builds the right-handed orthonormal view basis and rotates world
	/// space into it, then translates by the negated eye position.
	pub fn view_matrix(&self) -> Mat4 {
		let forward = (self.center - self.position).normalize();
		let right = forward.cross(self.up).normalize();
		let true_up = right.cross(forward);

		let basis = Mat4::from_rows([
			[right.x,    right.y,    right.z,    0.0],
			[true_up.x,  true_up.y,  true_up.z,  0.0],
			[-forward.x, -forward.y, -forward.z, 0.0],
			[0.0,        0.0,        0.0,        1.0],
		]);
		basis * Mat4::translation(-self.position)
	}
}
