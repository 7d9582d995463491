pub mod handler;
pub mod protocol;
pub mod session;
pub mod state;
pub mod views;

// Re-export the entry points the binary needs to mount the page and run the
// event loop.
pub use handler::{dispatch, render_all};
pub use session::run;
pub use state::SiteState;
