pub mod desktop;

pub use desktop::FileStorageProvider;
