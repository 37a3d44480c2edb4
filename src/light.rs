use glam::Vec3;

/// Fixed ambient intensity, not user editable.
pub const AMBIENT_INTENSITY: f32 = 0.15;
/// Fixed specular intensity, not user editable.
pub const SPECULAR_INTENSITY: f32 = 1.0;
/// Fixed spot falloff exponent.
pub const SPOT_EXPONENT: f32 = 50.0;
/// Spot lights always point down -Z.
pub const SPOT_DIRECTION: Vec3 = Vec3::new(0.0, 0.0, -1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
	Directional,
	Point,
	Spot,
}

impl LightMode {
	pub fn next(self) -> LightMode {
		match self {
			LightMode::Directional => LightMode::Point,
			LightMode::Point => LightMode::Spot,
			LightMode::Spot => LightMode::Directional,
		}
	}

	/// Position the light snaps back to whenever this mode is entered.
	pub fn default_position(self) -> Vec3 {
		match self {
			LightMode::Directional => Vec3::new(1.0, 1.0, 1.0),
			LightMode::Point => Vec3::new(0.0, 2.0, 1.0),
			LightMode::Spot => Vec3::new(0.0, 0.0, 2.0),
		}
	}

	fn attenuation(self) -> (f32, f32, f32) {
		match self {
			LightMode::Directional => (0.0, 0.0, 0.0),
			LightMode::Point => (0.01, 0.8, 0.1),
			LightMode::Spot => (0.05, 0.3, 0.6),
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct LightState {
	pub mode: LightMode,
	pub position: Vec3,
	pub diffuse: f32,
	pub shininess: f32,
	/// Spot half-angle cutoff, degrees.
	pub cutoff_degrees: f32,
}

impl Default for LightState {
	fn default() -> LightState {
		LightState {
			mode: LightMode::Directional,
			position: LightMode::Directional.default_position(),
			diffuse: 1.0,
			shininess: 64.0,
			cutoff_degrees: 30.0,
		}
	}
}

impl LightState {
	/// Advances to the next mode and resets the position to that mode's
	/// default.
	pub fn cycle_mode(&mut self) {
		self.mode = self.mode.next();
		self.position = self.mode.default_position();
		log::info!("light mode: {:?}", self.mode);
	}

	/// Flattens current state into the per-mode uniform set the shading
	/// stage consumes. Slots a mode does not use are zeroed.
	pub fn uniforms(&self) -> LightUniforms {
		let (constant, linear, quadratic) = self.mode.attenuation();
		let mut uniforms = LightUniforms {
			mode: self.mode,
			position: Vec3::ZERO,
			direction: Vec3::ZERO,
			ambient: AMBIENT_INTENSITY,
			diffuse: self.diffuse,
			specular: SPECULAR_INTENSITY,
			shininess: self.shininess,
			constant,
			linear,
			quadratic,
			cosine_cutoff: 0.0,
			spot_exponent: 0.0,
		};
		match self.mode {
			LightMode::Directional => {
				uniforms.direction = -self.position;
			}
			LightMode::Point => {
				uniforms.position = self.position;
			}
			LightMode::Spot => {
				uniforms.position = self.position;
				uniforms.direction = SPOT_DIRECTION;
				uniforms.cosine_cutoff = self.cutoff_degrees.to_radians().cos();
				uniforms.spot_exponent = SPOT_EXPONENT;
			}
		}
		uniforms
	}
}

/// Shading-stage parameter set for the active light mode.
#[derive(Debug, Clone, Copy)]
pub struct LightUniforms {
	pub mode: LightMode,
	pub position: Vec3,
	pub direction: Vec3,
	pub ambient: f32,
	pub diffuse: f32,
	pub specular: f32,
	pub shininess: f32,
	pub constant: f32,
	pub linear: f32,
	pub quadratic: f32,
	pub cosine_cutoff: f32,
	pub spot_exponent: f32,
}
