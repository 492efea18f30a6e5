//! Macro definition detection and the name registry

pub mod detector;
pub mod registry;

pub use detector::{DefinitionDetector, PatternDetector};
pub use registry::{MacroRegistry, RegistryError};
