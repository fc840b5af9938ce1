//! Grayscale image buffers, borrowed views, resampling and file I/O.
pub mod f32;
pub mod io;
pub mod resize;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::resize::{AntialiasScaler, ImageScaler, ResizeFilter};
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::ImageU8;
