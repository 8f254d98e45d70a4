pub mod image_loader;

pub use image_loader::{load_all_images, load_image_from_file};
