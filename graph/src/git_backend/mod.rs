pub mod store;

pub use store::GitStore;
