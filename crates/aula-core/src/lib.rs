pub mod error;
pub mod nav;
pub mod roles;
pub mod types;

pub use error::{ContextError, PendingActivityError};
pub use nav::Navigation;
pub use roles::{is_student_role, is_teacher_or_admin_role};
pub use types::*;
