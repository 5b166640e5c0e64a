pub mod activities;
pub mod context;
pub mod guards;
pub mod locale;
pub mod pending;

pub use activities::{
    create_activity, get_activity, submit_file, ActivityCreated, ActivityType, ApiError,
    NewActivity, SubmissionReceipt,
};
pub use context::{fetch_context, LTI_DATA_PATH};
pub use guards::{
    resolve_navigation, root_layout_guard, root_page_guard, GuardOptions, LayoutFetch,
};
pub use locale::{change_locale, initial_locale, Locale, LocaleError};
pub use pending::{activity_path, check_pending_activity, probe_activity, ActivityProbe};
