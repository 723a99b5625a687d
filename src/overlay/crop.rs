/// Crop extraction for a tapped detection.
///
/// Crops always come from the original raster using the untransformed box,
/// so the result keeps full source resolution.
use image::DynamicImage;

use crate::errors::{LensError, LensResult};
use crate::overlay::types::PixelRect;

/// A cropped object ready to hand to the product search.
#[derive(Debug, Clone)]
pub struct CroppedObject {
    pub image: DynamicImage,
    /// Box the crop was taken from, in source pixels.
    pub origin: PixelRect,
}

impl CroppedObject {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn to_png(&self) -> LensResult<Vec<u8>> {
        let mut png_bytes = Vec::new();
        self.image
            .write_to(
                &mut std::io::Cursor::new(&mut png_bytes),
                image::ImageFormat::Png,
            )?;
        Ok(png_bytes)
    }

    pub fn to_base64_png(&self) -> LensResult<String> {
        let png = self.to_png()?;
        Ok(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            &png,
        ))
    }
}

/// Cut `rect` out of `source`.
///
/// Out-of-bounds or empty boxes are reported, never clamped.
pub fn crop_original(source: Option<&DynamicImage>, rect: PixelRect) -> LensResult<CroppedObject> {
    let img = source.ok_or(LensError::NoImage)?;
    let (w, h) = (img.width(), img.height());

    if !rect.fits_within(w, h) {
        return Err(LensError::CropOutOfBounds {
            rect,
            width: w,
            height: h,
        });
    }

    let cropped = img.crop_imm(
        rect.left as u32,
        rect.top as u32,
        rect.width() as u32,
        rect.height() as u32,
    );

    Ok(CroppedObject {
        image: cropped,
        origin: rect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Each pixel encodes its own coordinates so crops can be located.
    fn coordinate_image(w: u32, h: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, (x / 256) as u8, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn crops_original_box_at_full_resolution() {
        let src = coordinate_image(1000, 1000);
        let crop = crop_original(Some(&src), PixelRect::new(100, 100, 200, 200)).unwrap();

        assert_eq!((crop.width(), crop.height()), (100, 100));
        let rgba = crop.image.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0), &Rgba([100, 100, 0, 255]));
        assert_eq!(rgba.get_pixel(99, 99), &Rgba([199, 199, 0, 255]));
    }

    #[test]
    fn missing_image_fails() {
        let result = crop_original(None, PixelRect::new(0, 0, 10, 10));
        assert!(matches!(result, Err(LensError::NoImage)));
    }

    #[test]
    fn overhanging_box_is_reported() {
        let src = coordinate_image(100, 80);
        let result = crop_original(Some(&src), PixelRect::new(50, 10, 101, 40));
        match result {
            Err(LensError::CropOutOfBounds { rect, width, height }) => {
                assert_eq!(rect, PixelRect::new(50, 10, 101, 40));
                assert_eq!((width, height), (100, 80));
            }
            other => panic!("expected CropOutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn negative_and_empty_boxes_are_reported() {
        let src = coordinate_image(100, 80);
        assert!(crop_original(Some(&src), PixelRect::new(-5, 0, 10, 10)).is_err());
        assert!(crop_original(Some(&src), PixelRect::new(10, 10, 10, 30)).is_err());
    }

    #[test]
    fn encodes_png_and_base64() {
        let src = coordinate_image(32, 32);
        let crop = crop_original(Some(&src), PixelRect::new(0, 0, 16, 8)).unwrap();
        let png = crop.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
        assert!(!crop.to_base64_png().unwrap().is_empty());
    }
}
