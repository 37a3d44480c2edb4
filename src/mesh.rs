use anyhow::bail;
use anyhow::Context;
use glam::Vec3;

/// Axis-aligned bounding box over a flat position array.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
	pub min: Vec3,
	pub max: Vec3,
}

impl Aabb {
	pub fn from_positions(positions: &[f32]) -> Option<Aabb> {
		let mut chunks = positions.chunks_exact(3);
		let first = chunks.next()?;
		let mut aabb = Aabb {
			min: Vec3::new(first[0], first[1], first[2]),
			max: Vec3::new(first[0], first[1], first[2]),
		};
		for v in chunks {
			aabb.min = aabb.min.min(Vec3::new(v[0], v[1], v[2]));
			aabb.max = aabb.max.max(Vec3::new(v[0], v[1], v[2]));
		}
		Some(aabb)
	}

	pub fn center(&self) -> Vec3 {
		(self.min + self.max) / 2.0
	}

	pub fn extent(&self) -> Vec3 {
		self.max - self.min
	}
}

/// Phong reflectance triple. Values are conventionally in [0, 1] but are
/// not clamped. An unresolved material stays all-zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhongMaterial {
	pub ambient: Vec3,
	pub diffuse: Vec3,
	pub specular: Vec3,
}

/// Raw per-vertex attributes as the mesh parser hands them over: flat
/// coordinate triples, colors parallel to positions, normals indexed
/// separately.
#[derive(Debug, Clone, Default)]
pub struct RawAttributes {
	pub positions: Vec<f32>,
	pub colors: Vec<f32>,
	pub normals: Vec<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct RawIndex {
	pub position: usize,
	pub normal: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RawFace {
	pub indices: Vec<RawIndex>,
	pub material_id: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RawShape {
	pub faces: Vec<RawFace>,
}

/// Parser output for one mesh file: shared attributes, the shapes indexing
/// into them, and the material table the face ids refer to.
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
	pub attributes: RawAttributes,
	pub shapes: Vec<RawShape>,
	pub materials: Vec<PhongMaterial>,
}

/// Canonical-space shape buffers, duplicated per triangle vertex and ready
/// for upload. The normal stream may be shorter than the vertex stream when
/// faces lack normal indices.
#[derive(Debug, Clone, Default)]
pub struct Shape {
	pub vertices: Vec<f32>,
	pub normals: Vec<f32>,
	pub colors: Vec<f32>,
	pub vertex_count: usize,
	pub material: PhongMaterial,
}

/// One loaded model: canonical shapes plus the TRS fields the interaction
/// layer mutates. Models live for the whole session.
#[derive(Debug, Clone)]
pub struct Model {
	pub position: Vec3,
	pub scale: Vec3,
	pub rotation: Vec3,
	pub shapes: Vec<Shape>,
}

impl Default for Model {
	fn default() -> Model {
		Model {
			position: Vec3::ZERO,
			scale: Vec3::ONE,
			rotation: Vec3::ZERO,
			shapes: vec![],
		}
	}
}

impl Model {
	/// Normalizes the raw attributes into canonical space and expands every
	/// shape into flat non-indexed buffers.
	pub fn from_raw(mut raw: RawMesh) -> anyhow::Result<Model> {
		normalize_positions(&mut raw.attributes.positions)?;

		let mut model = Model::default();
		for (i, shape) in raw.shapes.iter().enumerate() {
			let shape = expand_shape(&raw.attributes, shape, &raw.materials)
				.with_context(|| format!("shape {}", i))?;
			model.shapes.push(shape);
		}
		log::info!(
			"model loaded: {} shapes, {} materials",
			model.shapes.len(),
			raw.materials.len()
		);
		Ok(model)
	}
}

/// Centers the bounding box at the origin and rescales so the longest axis
/// spans [-1, 1]. Axes whose center offset is exactly zero keep their
/// coordinates; the other axes fit within the range, preserving aspect.
pub fn normalize_positions(positions: &mut [f32]) -> anyhow::Result<()> {
	let aabb = match Aabb::from_positions(positions) {
		Some(aabb) => aabb,
		None => bail!("mesh has no vertices"),
	};
	let offset = aabb.center();
	let extent = aabb.extent();
	let greatest_axis = extent.x.max(extent.y).max(extent.z);
	if greatest_axis <= 0.0 {
		bail!("mesh is degenerate: zero extent on every axis");
	}
	let scale = greatest_axis / 2.0;

	let offset = [offset.x, offset.y, offset.z];
	for (i, coord) in positions.iter_mut().enumerate() {
		if offset[i % 3] != 0.0 {
			*coord -= offset[i % 3];
		}
	}
	for coord in positions.iter_mut() {
		*coord /= scale;
	}
	Ok(())
}

/// Expands indexed faces into duplicated per-triangle streams, in face
/// order. A vertex without a normal index contributes nothing to the normal
/// stream. The shape's material is its first face's, per-face materials are
/// not supported.
fn expand_shape(attributes: &RawAttributes, shape: &RawShape, materials: &[PhongMaterial]) -> anyhow::Result<Shape> {
	let mut out = Shape::default();
	let vertex_slots = attributes.positions.len() / 3;

	for face in &shape.faces {
		for index in &face.indices {
			if index.position >= vertex_slots {
				bail!("vertex index {} out of range ({} vertices)", index.position, vertex_slots);
			}
			let p = index.position * 3;
			out.vertices.extend_from_slice(&attributes.positions[p..p + 3]);
			if p + 3 <= attributes.colors.len() {
				out.colors.extend_from_slice(&attributes.colors[p..p + 3]);
			} else {
				out.colors.extend_from_slice(&[1.0, 1.0, 1.0]);
			}
			if let Some(normal) = index.normal {
				let n = normal * 3;
				if n + 3 > attributes.normals.len() {
					bail!("normal index {} out of range", normal);
				}
				out.normals.extend_from_slice(&attributes.normals[n..n + 3]);
			}
		}
	}

	out.vertex_count = out.vertices.len() / 3;
	out.material = shape.faces.first()
		.and_then(|face| face.material_id)
		.and_then(|id| materials.get(id).copied())
		.unwrap_or_default();
	Ok(out)
}
