// ABOUTME: Library module for the code-walk program.
// ABOUTME: Contains the range stepper plus loading, rendering and publishing of walkthroughs.

pub mod config;
pub mod control;
pub mod errors;
pub mod html;
pub mod render;
pub mod resources;
pub mod script;
pub mod source;
pub mod stepper;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use control::{apply, Command, Outcome};
pub use errors::{Result, WalkError};
pub use html::{generate_html, write_html_to_file, HtmlConfig};
pub use render::{render_step, RenderConfig};
pub use resources::{ResourceFile, ResourceKind};
pub use script::{parse_script, Script, Walkthrough};
pub use source::SourceText;
pub use stepper::{RangeAnnotation, RangeStepper, StepView};
pub use watch::{watch_scripts, WatchConfig};
