//! Drawable size tracking
//!
//! The viewport stores device-scaled (physical) pixels. Resizing never
//! touches geometry; it only changes the aspect ratio used by the next
//! projection matrix.

use winit::dpi::PhysicalSize;

/// Physical drawable size and the scale factor it was derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl Viewport {
    /// Viewport from a size already in physical pixels
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self {
            width: size.width,
            height: size.height,
            scale_factor,
        }
    }

    /// Viewport from a logical size and device pixel ratio
    pub fn from_logical(width: f64, height: f64, scale_factor: f64) -> Self {
        Self {
            width: (width * scale_factor).round() as u32,
            height: (height * scale_factor).round() as u32,
            scale_factor,
        }
    }

    /// Apply a resize event carrying a physical size
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.width = size.width;
        self.height = size.height;
    }

    /// Apply a scale factor change, keeping the logical size
    pub fn rescale(&mut self, scale_factor: f64) {
        let logical_w = self.width as f64 / self.scale_factor;
        let logical_h = self.height as f64 / self.scale_factor;
        *self = Self::from_logical(logical_w, logical_h, scale_factor);
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }

    /// A minimized window has a zero-sized viewport
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height; 1.0 while the viewport is empty
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_follows_resize() {
        let mut viewport = Viewport::from_physical(PhysicalSize::new(800, 600), 1.0);
        assert_eq!(viewport.aspect_ratio(), 800.0 / 600.0);

        viewport.resize(PhysicalSize::new(400, 300));
        assert_eq!(viewport.aspect_ratio(), 400.0 / 300.0);

        viewport.resize(PhysicalSize::new(1000, 500));
        assert_eq!(viewport.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_logical_size_is_device_scaled() {
        let viewport = Viewport::from_logical(640.0, 480.0, 2.0);
        assert_eq!(viewport.width(), 1280);
        assert_eq!(viewport.height(), 960);
    }

    #[test]
    fn test_rescale_keeps_logical_size() {
        let mut viewport = Viewport::from_logical(500.0, 250.0, 1.0);
        viewport.rescale(1.5);
        assert_eq!(viewport.size(), PhysicalSize::new(750, 375));
        assert_eq!(viewport.scale_factor(), 1.5);
    }

    #[test]
    fn test_empty_viewport_aspect() {
        let viewport = Viewport::from_physical(PhysicalSize::new(0, 0), 1.0);
        assert!(viewport.is_empty());
        assert_eq!(viewport.aspect_ratio(), 1.0);
    }
}
