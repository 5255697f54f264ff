pub mod attractions;
pub mod cache;
pub mod error;
pub mod registry;
pub mod system;
pub mod trait_def;
pub mod weather;

pub use attractions::{Attraction, AttractionResults, AttractionsTool};
pub use cache::ToolCache;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use system::{ToolOutcome, ToolSystem};
pub use trait_def::Tool;
pub use weather::{WeatherReport, WeatherTool};
