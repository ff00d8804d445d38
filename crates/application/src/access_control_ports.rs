mod assignments;
mod limits;
mod permissions;
mod roles;

pub use assignments::UserRoleRepository;
pub use limits::AccessControlLimits;
pub use permissions::PermissionRepository;
pub use roles::{RoleRecord, RoleRepository};
