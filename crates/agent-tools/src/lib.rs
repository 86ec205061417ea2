//! Tool management for reasoning roles
//!
//! Tools are functions a role may ask the model to call (for example the
//! web search used by the research role). A [`ToolRegistry`] holds every
//! tool; each call narrows it to the names the role allows.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
