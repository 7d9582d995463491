pub mod file_storage;
pub mod toast;

pub use file_storage::FileStorage;
pub use toast::ToastQueue;
