use anyhow::Context;
use glam::Vec3;

use crate::camera::Camera;
use crate::input::Action;
use crate::input::InputEvent;
use crate::input::TransformMode;
use crate::light::LightMode;
use crate::light::LightState;
use crate::light::LightUniforms;
use crate::math::Mat4;
use crate::mesh::Model;
use crate::projection::ProjectionSettings;

/// Pointer deltas are divided by this before touching model state.
const DRAG_SENSITIVITY: f32 = 200.0;

/// Everything the shading stage needs for one frame. The MVP is already
/// converted to the column-major layout uniform uploads expect.
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms {
	pub model_transform: Mat4,
	pub normal_transform: Mat4,
	pub mvp: [f32; 16],
	pub view_position: Vec3,
	pub light: LightUniforms,
	pub wireframe: bool,
}

/// Single owner of all scene state. The host loop queues input events and
/// calls [`ViewerState::advance_frame`] once per frame; every queued event
/// is applied before any matrix is composed, so a frame never sees a
/// partial view of its input.
#[derive(Debug, Clone)]
pub struct ViewerState {
	pub models: Vec<Model>,
	pub cur_idx: usize,
	pub camera: Camera,
	pub proj: ProjectionSettings,
	pub light: LightState,
	pub trans_mode: TransformMode,
	pub wireframe: bool,
	view_matrix: Mat4,
	project_matrix: Mat4,
	pointer_pressed: bool,
	last_pointer: Option<(f32, f32)>,
}

impl ViewerState {
	pub fn new(models: Vec<Model>, width: u32, height: u32) -> ViewerState {
		let camera = Camera::default();
		let proj = ProjectionSettings::new(width, height);
		ViewerState {
			view_matrix: camera.view_matrix(),
			project_matrix: proj.perspective_matrix(),
			models,
			cur_idx: 0,
			camera,
			proj,
			light: LightState::default(),
			trans_mode: TransformMode::Translation,
			wireframe: false,
			pointer_pressed: false,
			last_pointer: None,
		}
	}

	pub fn active_model(&self) -> Option<&Model> {
		self.models.get(self.cur_idx)
	}

	pub fn active_model_mut(&mut self) -> Option<&mut Model> {
		self.models.get_mut(self.cur_idx)
	}

	pub fn set_camera(&mut self, camera: Camera) {
		self.camera = camera;
		self.view_matrix = camera.view_matrix();
	}

	pub fn view_matrix(&self) -> Mat4 {
		self.view_matrix
	}

	pub fn project_matrix(&self) -> Mat4 {
		self.project_matrix
	}

	/// Drains the frame's input events in order, then composes the matrices
	/// from the resulting state.
	pub fn advance_frame<I>(&mut self, events: I) -> anyhow::Result<FrameUniforms>
	where
		I: IntoIterator<Item = InputEvent>,
	{
		for event in events {
			self.handle_event(event);
		}
		self.compose_frame()
	}

	pub fn handle_event(&mut self, event: InputEvent) {
		match event {
			InputEvent::Key(action) => self.apply_action(action),
			InputEvent::Scroll { delta } => self.scroll(delta),
			InputEvent::PointerPressed => {
				self.pointer_pressed = true;
			}
			InputEvent::PointerReleased => {
				self.pointer_pressed = false;
				self.last_pointer = None;
			}
			InputEvent::PointerMoved { x, y } => self.pointer_moved(x, y),
			InputEvent::Resized { width, height } => {
				self.proj.set_viewport(width, height);
				self.project_matrix = self.proj.perspective_matrix();
			}
		}
	}

	fn apply_action(&mut self, action: Action) {
		match action {
			Action::NextModel => {
				if self.models.is_empty() {
					return;
				}
				self.cur_idx = if self.cur_idx < self.models.len() - 1 { self.cur_idx + 1 } else { 0 };
				log::info!("active model: {}", self.cur_idx);
			}
			Action::PrevModel => {
				if self.models.is_empty() {
					return;
				}
				self.cur_idx = if self.cur_idx > 0 { self.cur_idx - 1 } else { self.models.len() - 1 };
				log::info!("active model: {}", self.cur_idx);
			}
			Action::CycleLightMode => self.light.cycle_mode(),
			Action::SetMode(mode) => {
				self.trans_mode = mode;
				log::info!("transform mode: {:?}", mode);
			}
			Action::ToggleWireframe => {
				self.wireframe = !self.wireframe;
			}
			Action::RefreshProjection => {
				self.project_matrix = self.proj.perspective_matrix();
			}
		}
	}

	fn scroll(&mut self, delta: f32) {
		match self.trans_mode {
			TransformMode::Translation => {
				if let Some(model) = self.active_model_mut() {
					model.position.z += delta;
				}
			}
			TransformMode::Scaling => {
				if let Some(model) = self.active_model_mut() {
					model.scale.z += delta / 10.0;
				}
			}
			TransformMode::Rotation => {
				if let Some(model) = self.active_model_mut() {
					model.rotation.z += delta / 5.0;
				}
			}
			TransformMode::LightEdit => match self.light.mode {
				LightMode::Spot => self.light.cutoff_degrees += delta,
				_ => self.light.diffuse += delta / 5.0,
			},
			TransformMode::ShininessEdit => {
				self.light.shininess += delta;
			}
		}
	}

	/// Incremental drag handling: the first sample after engagement only
	/// records the origin, later samples apply the offset from the previous
	/// sample. Screen Y grows downward, so dy is negated for the modes that
	/// follow world-space Y.
	fn pointer_moved(&mut self, x: f32, y: f32) {
		if !self.pointer_pressed {
			return;
		}
		let (last_x, last_y) = match self.last_pointer {
			Some(last) => last,
			None => {
				self.last_pointer = Some((x, y));
				return;
			}
		};
		let dx = (x - last_x) / DRAG_SENSITIVITY;
		let dy_screen = (y - last_y) / DRAG_SENSITIVITY;
		let dy = -dy_screen;

		match self.trans_mode {
			TransformMode::Translation => {
				if let Some(model) = self.active_model_mut() {
					model.position.x += dx;
					model.position.y += dy;
				}
			}
			TransformMode::Scaling => {
				if let Some(model) = self.active_model_mut() {
					model.scale.x += dx;
					model.scale.y += dy;
				}
			}
			TransformMode::Rotation => {
				// pitch follows the raw screen delta, yaw opposes the X delta
				if let Some(model) = self.active_model_mut() {
					model.rotation.x += dy_screen;
					model.rotation.y -= dx;
				}
			}
			TransformMode::LightEdit => {
				self.light.position.x += dx;
				self.light.position.y += dy;
			}
			TransformMode::ShininessEdit => {}
		}
		self.last_pointer = Some((x, y));
	}

	/// Model matrix is `T * Rx * Ry * Rz * S`: scale first, rotate per axis
	/// in X, Y, Z order, translate last. Other orders render differently
	/// under non-uniform scale, so the order is fixed.
	fn compose_frame(&self) -> anyhow::Result<FrameUniforms> {
		let model = self.active_model().context("no models loaded")?;
		let model_transform = Mat4::translation(model.position)
			* Mat4::rotation(model.rotation)
			* Mat4::scaling(model.scale);
		let normal_transform = match model_transform.inverse() {
			Some(inverse) => inverse.transpose(),
			None => {
				log::warn!("model transform is singular, using identity normal matrix");
				Mat4::identity()
			}
		};
		let mvp = self.project_matrix * self.view_matrix * model_transform;

		Ok(FrameUniforms {
			model_transform,
			normal_transform,
			mvp: mvp.to_cols_array(),
			view_position: self.camera.position,
			light: self.light.uniforms(),
			wireframe: self.wireframe,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::light::LightMode;

	fn state_with_models(count: usize) -> ViewerState {
		let models = (0..count).map(|_| Model::default()).collect();
		ViewerState::new(models, 800, 800)
	}

	#[test]
	fn scroll_in_translation_moves_z() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::Scroll { delta: 3.0 });
		assert_eq!(state.active_model().unwrap().position.z, 3.0);
	}

	#[test]
	fn scroll_sensitivities_per_mode() {
		let mut state = state_with_models(1);

		state.handle_event(InputEvent::Key(Action::SetMode(TransformMode::Scaling)));
		state.handle_event(InputEvent::Scroll { delta: 5.0 });
		assert_eq!(state.active_model().unwrap().scale.z, 1.5);

		state.handle_event(InputEvent::Key(Action::SetMode(TransformMode::Rotation)));
		state.handle_event(InputEvent::Scroll { delta: 5.0 });
		assert_eq!(state.active_model().unwrap().rotation.z, 1.0);

		state.handle_event(InputEvent::Key(Action::SetMode(TransformMode::ShininessEdit)));
		state.handle_event(InputEvent::Scroll { delta: 2.0 });
		assert_eq!(state.light.shininess, 66.0);
	}

	#[test]
	fn light_edit_scroll_branches_on_mode() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::Key(Action::SetMode(TransformMode::LightEdit)));

		state.handle_event(InputEvent::Scroll { delta: 5.0 });
		assert_eq!(state.light.diffuse, 2.0);

		state.light.mode = LightMode::Spot;
		state.handle_event(InputEvent::Scroll { delta: 5.0 });
		assert_eq!(state.light.cutoff_degrees, 35.0);
		assert_eq!(state.light.diffuse, 2.0);
	}

	#[test]
	fn model_cycling_wraps_both_ways() {
		let mut state = state_with_models(3);
		state.handle_event(InputEvent::Key(Action::PrevModel));
		assert_eq!(state.cur_idx, 2);
		state.handle_event(InputEvent::Key(Action::NextModel));
		assert_eq!(state.cur_idx, 0);
		state.handle_event(InputEvent::Key(Action::NextModel));
		state.handle_event(InputEvent::Key(Action::NextModel));
		state.handle_event(InputEvent::Key(Action::NextModel));
		assert_eq!(state.cur_idx, 0);
	}

	#[test]
	fn cycling_with_no_models_is_a_noop() {
		let mut state = state_with_models(0);
		state.handle_event(InputEvent::Key(Action::NextModel));
		state.handle_event(InputEvent::Key(Action::PrevModel));
		assert_eq!(state.cur_idx, 0);
		assert!(state.advance_frame(std::iter::empty()).is_err());
	}

	#[test]
	fn first_drag_sample_records_origin_only() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::Key(Action::SetMode(TransformMode::Rotation)));
		state.handle_event(InputEvent::PointerPressed);
		state.handle_event(InputEvent::PointerMoved { x: 100.0, y: 100.0 });
		assert_eq!(state.active_model().unwrap().rotation, Vec3::ZERO);

		state.handle_event(InputEvent::PointerMoved { x: 150.0, y: 120.0 });
		let rotation = state.active_model().unwrap().rotation;
		assert!((rotation.x - 20.0 / 200.0).abs() < 1e-6);
		assert!((rotation.y + 50.0 / 200.0).abs() < 1e-6);
	}

	#[test]
	fn drag_offsets_are_incremental() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::PointerPressed);
		state.handle_event(InputEvent::PointerMoved { x: 0.0, y: 0.0 });
		state.handle_event(InputEvent::PointerMoved { x: 100.0, y: 0.0 });
		state.handle_event(InputEvent::PointerMoved { x: 200.0, y: 0.0 });
		// two increments of 100 each, not 100 + 200 from the origin
		assert!((state.active_model().unwrap().position.x - 1.0).abs() < 1e-6);
	}

	#[test]
	fn translation_drag_inverts_screen_y() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::PointerPressed);
		state.handle_event(InputEvent::PointerMoved { x: 0.0, y: 0.0 });
		state.handle_event(InputEvent::PointerMoved { x: 0.0, y: 20.0 });
		assert!((state.active_model().unwrap().position.y + 0.1).abs() < 1e-6);
	}

	#[test]
	fn release_clears_drag_origin() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::PointerPressed);
		state.handle_event(InputEvent::PointerMoved { x: 0.0, y: 0.0 });
		state.handle_event(InputEvent::PointerReleased);
		state.handle_event(InputEvent::PointerPressed);
		state.handle_event(InputEvent::PointerMoved { x: 50.0, y: 50.0 });
		// first sample after re-engagement records the origin again
		assert_eq!(state.active_model().unwrap().position, Vec3::ZERO);
	}

	#[test]
	fn moves_while_disengaged_are_ignored() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::PointerMoved { x: 0.0, y: 0.0 });
		state.handle_event(InputEvent::PointerMoved { x: 300.0, y: 300.0 });
		assert_eq!(state.active_model().unwrap().position, Vec3::ZERO);
	}

	#[test]
	fn shininess_mode_ignores_drag() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::Key(Action::SetMode(TransformMode::ShininessEdit)));
		state.handle_event(InputEvent::PointerPressed);
		state.handle_event(InputEvent::PointerMoved { x: 0.0, y: 0.0 });
		state.handle_event(InputEvent::PointerMoved { x: 100.0, y: 100.0 });
		assert_eq!(state.light.shininess, 64.0);
		assert_eq!(state.active_model().unwrap().position, Vec3::ZERO);
	}

	#[test]
	fn light_edit_drag_moves_light() {
		let mut state = state_with_models(1);
		state.handle_event(InputEvent::Key(Action::SetMode(TransformMode::LightEdit)));
		state.handle_event(InputEvent::PointerPressed);
		state.handle_event(InputEvent::PointerMoved { x: 0.0, y: 0.0 });
		state.handle_event(InputEvent::PointerMoved { x: 40.0, y: -20.0 });
		assert!((state.light.position.x - 1.2).abs() < 1e-6);
		assert!((state.light.position.y - 1.1).abs() < 1e-6);
	}

	#[test]
	fn frame_reflects_all_queued_events() {
		let mut state = state_with_models(1);
		let frame = state.advance_frame([
			InputEvent::Scroll { delta: 3.0 },
			InputEvent::Key(Action::ToggleWireframe),
		]).unwrap();
		assert_eq!(frame.model_transform.at(2, 3), 3.0);
		assert!(frame.wireframe);
		assert_eq!(frame.view_position, Vec3::new(0.0, 0.0, 2.0));
	}

	#[test]
	fn model_matrix_scales_before_rotating_and_translating() {
		let mut state = state_with_models(1);
		{
			let model = state.active_model_mut().unwrap();
			model.scale = Vec3::new(2.0, 1.0, 1.0);
			model.rotation = Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
			model.position = Vec3::new(0.0, 5.0, 0.0);
		}
		let frame = state.advance_frame(std::iter::empty()).unwrap();
		// (1,0,0) scales to (2,0,0), rotates to (0,2,0), translates to (0,7,0)
		let p = frame.model_transform.transform_point(Vec3::new(1.0, 0.0, 0.0));
		assert!((p - Vec3::new(0.0, 7.0, 0.0)).length() < 1e-5);
	}

	#[test]
	fn normal_matrix_is_transposed_inverse() {
		let mut state = state_with_models(1);
		state.active_model_mut().unwrap().scale = Vec3::new(2.0, 1.0, 1.0);
		let frame = state.advance_frame(std::iter::empty()).unwrap();
		let expected = frame.model_transform.inverse().unwrap().transpose();
		assert_eq!(frame.normal_transform, expected);
	}

	#[test]
	fn singular_scale_falls_back_to_identity_normals() {
		let mut state = state_with_models(1);
		state.active_model_mut().unwrap().scale = Vec3::ZERO;
		let frame = state.advance_frame(std::iter::empty()).unwrap();
		assert_eq!(frame.normal_transform, Mat4::identity());
	}

	#[test]
	fn resize_recomputes_projection() {
		let mut state = state_with_models(1);
		let before = state.project_matrix().at(0, 0);
		state.handle_event(InputEvent::Resized { width: 1600, height: 800 });
		let after = state.project_matrix().at(0, 0);
		assert!((after - before / 2.0).abs() < 1e-5);
		assert_eq!(state.proj.aspect, 2.0);
	}

	#[test]
	fn loaded_model_flows_through_to_a_frame() {
		use crate::mesh::{RawAttributes, RawFace, RawIndex, RawMesh, RawShape};

		let raw = RawMesh {
			attributes: RawAttributes {
				positions: vec![
					0.0, 0.0, 0.0,
					2.0, 0.0, 0.0,
					2.0, 1.0, 1.0,
				],
				colors: vec![],
				normals: vec![],
			},
			shapes: vec![RawShape {
				faces: vec![RawFace {
					indices: vec![
						RawIndex { position: 0, normal: None },
						RawIndex { position: 1, normal: None },
						RawIndex { position: 2, normal: None },
					],
					material_id: None,
				}],
			}],
			materials: vec![],
		};
		let model = Model::from_raw(raw).unwrap();
		let mut state = ViewerState::new(vec![model], 800, 800);

		// default camera sits at (0,0,2) looking at the origin
		assert_eq!(state.view_matrix().at(2, 3), -2.0);

		let frame = state.advance_frame([InputEvent::Scroll { delta: 3.0 }]).unwrap();
		assert_eq!(frame.model_transform.at(2, 3), 3.0);
		let shape = &state.active_model().unwrap().shapes[0];
		assert_eq!(shape.vertex_count, 3);
		// longest axis of the source triangle spans [-1, 1] after loading
		assert_eq!(shape.vertices[0], -1.0);
		assert_eq!(shape.vertices[3], 1.0);
	}

	#[test]
	fn mvp_is_exported_column_major() {
		let mut state = state_with_models(1);
		state.active_model_mut().unwrap().position = Vec3::new(1.0, 2.0, 3.0);
		let frame = state.advance_frame(std::iter::empty()).unwrap();
		let mvp = state.project_matrix() * state.view_matrix() * frame.model_transform;
		for row in 0..4 {
			for col in 0..4 {
				assert_eq!(frame.mvp[col * 4 + row], mvp.at(row, col));
			}
		}
	}
}
