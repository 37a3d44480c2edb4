/// Which parameter set continuous input currently edits. Exactly one mode
/// is active; switching is a discrete action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
	Translation,
	Rotation,
	Scaling,
	LightEdit,
	ShininessEdit,
}

/// One-shot key-style actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	NextModel,
	PrevModel,
	CycleLightMode,
	SetMode(TransformMode),
	ToggleWireframe,
	RefreshProjection,
}

/// Everything the input collaborator can deliver. Events are queued by the
/// host loop and drained once per frame, before matrix composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
	Key(Action),
	/// Scroll-style scalar delta, positive when scrolling up.
	Scroll { delta: f32 },
	PointerPressed,
	PointerReleased,
	/// Absolute pointer position in window coordinates, Y grows downward.
	PointerMoved { x: f32, y: f32 },
	Resized { width: u32, height: u32 },
}
