//! Configuration layer
//!
//! INI storage, the typed file-backed proxy on top of it, the property
//! protocol for path-addressed access and the concrete log section.

pub mod ini;
pub mod log_section;
pub mod property;
pub mod proxy;
pub mod section;

pub use ini::IniStore;
pub use log_section::{
    parse_rotate_each, LogConfigurationSection, RotationUnit, SyslogTarget,
    CONFIGURATION_ALL_LOG_ENABLED_GROUPS, CONFIGURATION_SECTION_LOG,
};
pub use property::{traverse_path, PropertyDeclaration, PropertyKind, PropertySection};
pub use proxy::{
    FileConfigurationProxy, OrInherit, CONFIGURATION_DISABLED_VALUE,
    CONFIGURATION_DISABLED_VALUES, CONFIGURATION_INHERIT_VALUE, CONFIGURATION_INHERIT_VALUES,
};
pub use section::SectionBinding;
