//! Configuration section definitions.

mod build;
mod package;
mod purge;
mod serve;
mod theme;

pub use build::BuildConfig;
pub use package::PackageConfig;
pub use purge::PurgeConfig;
pub use serve::ServeConfig;
pub use theme::ThemeInfoConfig;
