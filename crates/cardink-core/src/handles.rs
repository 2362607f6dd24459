//! Manipulation handles on the selected item.

use kurbo::{Point, Vec2};

use crate::items::Item;

/// Handle diameter in screen pixels.
pub const HANDLE_SIZE: f64 = 12.0;
/// Distance from the item's top edge to the rotate handle, in canvas units.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Bottom-right corner; drags resize the item. Images only.
    Resize,
    /// Above the top-center; drags rotate about the item center.
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Canvas-space position, already rotated with the item.
    pub position: Point,
}

fn rotate_about(p: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = p - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Handles for the given item in canvas space. Text items only expose the
/// rotate handle; their box follows the text, so there is nothing to resize.
pub fn handle_positions(item: &Item) -> Vec<Handle> {
    let bounds = item.bounds();
    let center = bounds.center();
    let rotation = item.rotation();
    let mut handles = vec![Handle {
        kind: HandleKind::Rotate,
        position: rotate_about(
            Point::new(center.x, bounds.y0 - ROTATE_HANDLE_OFFSET),
            center,
            rotation,
        ),
    }];
    if item.as_image().is_some() {
        handles.push(Handle {
            kind: HandleKind::Resize,
            position: rotate_about(Point::new(bounds.x1, bounds.y1), center, rotation),
        });
    }
    handles
}

/// Hit test the handles of an item against a canvas-space point. Tolerance
/// is the handle radius in screen pixels, so it shrinks in canvas units as
/// the zoom grows.
pub fn hit_test_handles(item: &Item, point: Point, zoom: f64) -> Option<HandleKind> {
    let radius = HANDLE_SIZE / zoom;
    handle_positions(item)
        .into_iter()
        .find(|handle| handle.position.distance(point) <= radius)
        .map(|handle| handle.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ImageItem, ImageRef, TextItem};
    use kurbo::Point;

    fn image_at(x: f64, y: f64, w: f64, h: f64) -> Item {
        Item::Image(ImageItem::new(
            ImageRef::Named("ic1".into()),
            Point::new(x, y),
            w,
            h,
        ))
    }

    #[test]
    fn unrotated_positions() {
        let item = image_at(100.0, 100.0, 60.0, 40.0);
        let handles = handle_positions(&item);
        let rotate = handles.iter().find(|h| h.kind == HandleKind::Rotate).unwrap();
        let resize = handles.iter().find(|h| h.kind == HandleKind::Resize).unwrap();
        assert_eq!(rotate.position, Point::new(130.0, 80.0));
        assert_eq!(resize.position, Point::new(160.0, 140.0));
    }

    #[test]
    fn text_has_no_resize_handle() {
        let item = Item::Text(TextItem::new(Point::ZERO, "t".into()));
        let handles = handle_positions(&item);
        assert!(handles.iter().all(|h| h.kind != HandleKind::Resize));
        assert!(handles.iter().any(|h| h.kind == HandleKind::Rotate));
    }

    #[test]
    fn handles_follow_rotation() {
        let mut item = image_at(0.0, 0.0, 40.0, 40.0);
        item.set_rotation(180.0);
        let handles = handle_positions(&item);
        let rotate = handles.iter().find(|h| h.kind == HandleKind::Rotate).unwrap();
        // Top-center handle flips below the item.
        assert!((rotate.position.x - 20.0).abs() < 1e-9);
        assert!((rotate.position.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn hit_tolerance_scales_with_zoom() {
        let item = image_at(100.0, 100.0, 60.0, 40.0);
        let near = Point::new(165.0, 140.0);
        assert_eq!(hit_test_handles(&item, near, 1.0), Some(HandleKind::Resize));
        assert_eq!(hit_test_handles(&item, near, 3.0), None);
    }
}
