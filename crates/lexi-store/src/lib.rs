mod filesystem;
mod record;

pub use filesystem::FsCardStore;
