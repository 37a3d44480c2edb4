use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;

fn default_window_side() -> u32 {
	800
}

/// Startup configuration: window size and the mesh files to load, in the
/// order they become cyclable models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
	#[serde(default = "default_window_side")]
	pub width: u32,
	#[serde(default = "default_window_side")]
	pub height: u32,
	#[serde(default)]
	pub models: Vec<PathBuf>,
}

impl Default for ViewerConfig {
	fn default() -> ViewerConfig {
		ViewerConfig {
			width: 800,
			height: 800,
			models: vec![],
		}
	}
}

impl ViewerConfig {
	pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ViewerConfig> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("reading config {:?}", path))?;
		let config = serde_json::from_str(&text)
			.with_context(|| format!("parsing config {:?}", path))?;
		Ok(config)
	}
}
