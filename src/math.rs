use glam::Vec3;

/// Determinants below this are treated as singular.
const DET_EPSILON: f32 = 1e-8;

/// Row-major 4x4 transform matrix.
///
/// `A * B` applies `B` first, then `A`, to a column vector. GPU uniform
/// APIs want column-major data, use [`Mat4::to_cols_array`] for that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
	data: [[f32; 4]; 4],
}

impl Mat4 {
	pub fn identity() -> Mat4 {
		Mat4 {
			data: [
				[1.0, 0.0, 0.0, 0.0],
				[0.0, 1.0, 0.0, 0.0],
				[0.0, 0.0, 1.0, 0.0],
				[0.0, 0.0, 0.0, 1.0]
			]
		}
	}

	pub fn from_rows(data: [[f32; 4]; 4]) -> Mat4 {
		Mat4 { data }
	}

	pub fn translation(v: Vec3) -> Mat4 {
		let mut mat = Mat4::identity();
		mat.data[0][3] = v.x;
		mat.data[1][3] = v.y;
		mat.data[2][3] = v.z;
		mat
	}

	pub fn scaling(v: Vec3) -> Mat4 {
		let mut mat = Mat4::identity();
		mat.data[0][0] = v.x;
		mat.data[1][1] = v.y;
		mat.data[2][2] = v.z;
		mat
	}

	pub fn rotation_x(angle: f32) -> Mat4 {
		let mut mat = Mat4::identity();
		let cos = angle.cos();
		let sin = angle.sin();
		mat.data[1][1] = cos;
		mat.data[1][2] = -sin;
		mat.data[2][1] = sin;
		mat.data[2][2] = cos;
		mat
	}

	pub fn rotation_y(angle: f32) -> Mat4 {
		let mut mat = Mat4::identity();
		let cos = angle.cos();
		let sin = angle.sin();
		mat.data[0][0] = cos;
		mat.data[0][2] = sin;
		mat.data[2][0] = -sin;
		mat.data[2][2] = cos;
		mat
	}

	pub fn rotation_z(angle: f32) -> Mat4 {
		let mut mat = Mat4::identity();
		let cos = angle.cos();
		let sin = angle.sin();
		mat.data[0][0] = cos;
		mat.data[0][1] = -sin;
		mat.data[1][0] = sin;
		mat.data[1][1] = cos;
		mat
	}

	/// Per-axis Euler rotation: `Rx * Ry * Rz` applies Z, then Y, then X.
	pub fn rotation(angles: Vec3) -> Mat4 {
		Mat4::rotation_x(angles.x) * Mat4::rotation_y(angles.y) * Mat4::rotation_z(angles.z)
	}

	pub fn row(&self, i: usize) -> [f32; 4] {
		self.data[i]
	}

	pub fn at(&self, row: usize, col: usize) -> f32 {
		self.data[row][col]
	}

	pub fn transpose(&self) -> Mat4 {
		let m = &self.data;
		Mat4 {
			data: [
				[m[0][0], m[1][0], m[2][0], m[3][0]],
				[m[0][1], m[1][1], m[2][1], m[3][1]],
				[m[0][2], m[1][2], m[2][2], m[3][2]],
				[m[0][3], m[1][3], m[2][3], m[3][3]],
			]
		}
	}

	pub fn determinant(&self) -> f32 {
		let m = &self.data;
		let s0 = m[0][0] * m[1][1] - m[1][0] * m[0][1];
		let s1 = m[0][0] * m[1][2] - m[1][0] * m[0][2];
		let s2 = m[0][0] * m[1][3] - m[1][0] * m[0][3];
		let s3 = m[0][1] * m[1][2] - m[1][1] * m[0][2];
		let s4 = m[0][1] * m[1][3] - m[1][1] * m[0][3];
		let s5 = m[0][2] * m[1][3] - m[1][2] * m[0][3];
		let c5 = m[2][2] * m[3][3] - m[3][2] * m[2][3];
		let c4 = m[2][1] * m[3][3] - m[3][1] * m[2][3];
		let c3 = m[2][1] * m[3][2] - m[3][1] * m[2][2];
		let c2 = m[2][0] * m[3][3] - m[3][0] * m[2][3];
		let c1 = m[2][0] * m[3][2] - m[3][0] * m[2][2];
		let c0 = m[2][0] * m[3][1] - m[3][0] * m[2][1];
		s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0
	}

	/// General inverse via 2x2 sub-determinants. Returns `None` when the
	/// determinant is within epsilon of zero.
	pub fn inverse(&self) -> Option<Mat4> {
		let m = &self.data;
		let s0 = m[0][0] * m[1][1] - m[1][0] * m[0][1];
		let s1 = m[0][0] * m[1][2] - m[1][0] * m[0][2];
		let s2 = m[0][0] * m[1][3] - m[1][0] * m[0][3];
		let s3 = m[0][1] * m[1][2] - m[1][1] * m[0][2];
		let s4 = m[0][1] * m[1][3] - m[1][1] * m[0][3];
		let s5 = m[0][2] * m[1][3] - m[1][2] * m[0][3];
		let c5 = m[2][2] * m[3][3] - m[3][2] * m[2][3];
		let c4 = m[2][1] * m[3][3] - m[3][1] * m[2][3];
		let c3 = m[2][1] * m[3][2] - m[3][1] * m[2][2];
		let c2 = m[2][0] * m[3][3] - m[3][0] * m[2][3];
		let c1 = m[2][0] * m[3][2] - m[3][0] * m[2][2];
		let c0 = m[2][0] * m[3][1] - m[3][0] * m[2][1];

		let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
		if det.abs() < DET_EPSILON {
			return None;
		}
		let inv = 1.0 / det;

		Some(Mat4 {
			data: [
				[
					( m[1][1] * c5 - m[1][2] * c4 + m[1][3] * c3) * inv,
					(-m[0][1] * c5 + m[0][2] * c4 - m[0][3] * c3) * inv,
					( m[3][1] * s5 - m[3][2] * s4 + m[3][3] * s3) * inv,
					(-m[2][1] * s5 + m[2][2] * s4 - m[2][3] * s3) * inv,
				],
				[
					(-m[1][0] * c5 + m[1][2] * c2 - m[1][3] * c1) * inv,
					( m[0][0] * c5 - m[0][2] * c2 + m[0][3] * c1) * inv,
					(-m[3][0] * s5 + m[3][2] * s2 - m[3][3] * s1) * inv,
					( m[2][0] * s5 - m[2][2] * s2 + m[2][3] * s1) * inv,
				],
				[
					( m[1][0] * c4 - m[1][1] * c2 + m[1][3] * c0) * inv,
					(-m[0][0] * c4 + m[0][1] * c2 - m[0][3] * c0) * inv,
					( m[3][0] * s4 - m[3][1] * s2 + m[3][3] * s0) * inv,
					(-m[2][0] * s4 + m[2][1] * s2 - m[2][3] * s0) * inv,
				],
				[
					(-m[1][0] * c3 + m[1][1] * c1 - m[1][2] * c0) * inv,
					( m[0][0] * c3 - m[0][1] * c1 + m[0][2] * c0) * inv,
					(-m[3][0] * s3 + m[3][1] * s1 - m[3][2] * s0) * inv,
					( m[2][0] * s3 - m[2][1] * s1 + m[2][2] * s0) * inv,
				],
			]
		})
	}

	pub fn transform_point(&self, point: Vec3) -> Vec3 {
		let m = &self.data;
		let x = m[0][0] * point.x + m[0][1] * point.y + m[0][2] * point.z + m[0][3];
		let y = m[1][0] * point.x + m[1][1] * point.y + m[1][2] * point.z + m[1][3];
		let z = m[2][0] * point.x + m[2][1] * point.y + m[2][2] * point.z + m[2][3];
		let w = m[3][0] * point.x + m[3][1] * point.y + m[3][2] * point.z + m[3][3];
		Vec3::new(x / w, y / w, z / w)
	}

	/// Flattens into the column-major layout GPU uniform APIs expect:
	/// `out[col * 4 + row] == self.at(row, col)`. The transposition here is
	/// load-bearing, swapping it flips rotation handedness on the GPU side.
	pub fn to_cols_array(&self) -> [f32; 16] {
		let mut out = [0.0; 16];
		for row in 0..4 {
			for col in 0..4 {
				out[col * 4 + row] = self.data[row][col];
			}
		}
		out
	}
}

impl std::ops::Mul for Mat4 {
	type Output = Mat4;

	fn mul(self, other: Mat4) -> Mat4 {
		let mut result = Mat4 { data: [[0.0; 4]; 4] };
		for i in 0..4 {
			for j in 0..4 {
				for k in 0..4 {
					result.data[i][j] += self.data[i][k] * other.data[k][j];
				}
			}
		}
		result
	}
}
