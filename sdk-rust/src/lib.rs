mod client_utils;
mod errors;
mod image_model;
mod types;
mod types_ext;

pub mod genimage_sdk_test;
pub mod google;

pub use errors::*;
pub use image_model::ImageModel;
pub use types::*;
