//! Third-party media host integration

mod cloudinary;

pub use cloudinary::{CloudinaryClient, CloudinaryCredentials, MediaUploader, UploadError};
