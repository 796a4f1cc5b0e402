pub mod changelog;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod template;

pub use changelog::{Changelog, Report};
pub use config::{Config, TimeZoneConfig, DEFAULT_HASH_DIGITS};
pub use error::{ChangelogError, Result};
pub use model::{HashWidth, ReportBuilder, ReportModel, ReportRow};
pub use render::{Renderer, ReportTemplates};
pub use template::TemplateSet;
