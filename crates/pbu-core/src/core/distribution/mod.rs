//! Operations on build output: wheels, source archives, and packed extensions.

mod filename;
mod pyd2wheel;
mod rename;
mod tarballs;

pub use filename::{MissingVersionError, PydFilename, PydFilenameError};
pub use pyd2wheel::{pyd2wheel, Pyd2WheelRequest};
pub use rename::{rename_wheel_files, RenameWheelRequest};
pub use tarballs::{remove_tarballs, RemoveTarballsRequest};
