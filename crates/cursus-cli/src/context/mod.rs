mod app_context;
mod snapshot_source;

pub use app_context::AppContext;
pub use snapshot_source::read_bundle_file;
