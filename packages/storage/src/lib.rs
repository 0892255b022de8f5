mod error;
mod traits;
mod transform;

pub mod cloudinary;
pub mod filesystem;

pub use error::StorageError;
pub use traits::{DestroyStatus, PhotoStore, StoredImage};
pub use transform::{Crop, Gravity, Transformation};
