pub mod role;

pub use role::{Access, Role, Section, SectionAccess};
