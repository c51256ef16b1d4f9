//! PNG I/O for surfaces.
//!
//! Feature-gated behind `png` (default on) so library consumers that never
//! touch the filesystem can depend on this crate without pulling in the
//! `image` crate.

use std::path::Path;

use meshwarp_core::WarpError;

use crate::surface::Surface;

/// Writes a surface as a PNG image.
///
/// Returns `WarpError::InvalidDimensions` if the dimensions overflow `u32`,
/// or `WarpError::Io` on encode/write failure.
pub fn write_png(surface: &Surface, path: &Path) -> Result<(), WarpError> {
    let w = u32::try_from(surface.width()).map_err(|_| WarpError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| WarpError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.data().to_vec())
        .ok_or_else(|| WarpError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| WarpError::Io(e.to_string()))
}

/// Reads an image file into an RGBA surface.
pub fn read_png(path: &Path) -> Result<Surface, WarpError> {
    let img = image::open(path)
        .map_err(|e| WarpError::Io(e.to_string()))?
        .to_rgba8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    Surface::from_rgba8(w, h, img.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let mut surface = Surface::new(16, 9).unwrap();
        for y in 0..9 {
            for x in 0..16 {
                surface.put_pixel(x, y, [(x * 16) as u8, (y * 28) as u8, 7, 255]);
            }
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warp.png");

        write_png(&surface, &path).unwrap();
        let back = read_png(&path).unwrap();

        assert_eq!(back.width(), 16);
        assert_eq!(back.height(), 9);
        assert_eq!(back.data(), surface.data());
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let result = read_png(Path::new("/nonexistent/warp.png"));
        assert!(matches!(result, Err(WarpError::Io(_))));
    }
}
