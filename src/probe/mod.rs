mod cert;
mod trust;
mod version;

pub use version::VersionProber;
