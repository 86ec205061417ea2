//! Tools available to the reasoning roles

pub mod web_search;

pub use web_search::TavilySearchTool;
