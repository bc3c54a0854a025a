use super::*;
use crate::{
    foundation::core::Rect, geometry::zone::ExclusionZone, surface::source::PreparedImage,
};

fn white() -> PreparedImage {
    PreparedImage::solid(8, 8, [255, 255, 255, 255])
}

#[test]
fn reveal_inside_is_limited_to_zone_pixels() {
    let img = white();
    let mut s = Surface::new(8, 8);
    let zones = ZoneSet::new(vec![ExclusionZone::Rect {
        rect: Rect::new(2.0, 2.0, 4.0, 6.0),
    }]);
    reveal_inside(&mut s, &img.view(), &zones, 1, 1.0);
    assert_eq!(s.pixel(2, 2), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(3, 5), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(4, 2), Some([0, 0, 0, 255]));
    assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 255]));
    assert_eq!(s.revealed_fraction(), 8.0 / 64.0);
}

#[test]
fn fragments_snap_to_grid_by_center() {
    let img = white();
    let mut s = Surface::new(8, 8);
    // Block (4..8, 4..8) has center (6, 6), inside; block (0..4, 0..4) center (2, 2), outside.
    let zones = ZoneSet::new(vec![ExclusionZone::Rect {
        rect: Rect::new(3.0, 3.0, 8.0, 8.0),
    }]);
    reveal_inside(&mut s, &img.view(), &zones, 4, 1.0);
    assert_eq!(s.pixel(4, 4), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(3, 3), Some([0, 0, 0, 255]));
    assert_eq!(s.revealed_fraction(), 0.25);
}

#[test]
fn zero_opacity_or_no_zones_is_a_no_op() {
    let img = white();
    let mut s = Surface::new(8, 8);
    reveal_inside(&mut s, &img.view(), &ZoneSet::default(), 1, 1.0);
    let zones = ZoneSet::new(vec![ExclusionZone::Rect {
        rect: Rect::new(0.0, 0.0, 8.0, 8.0),
    }]);
    reveal_inside(&mut s, &img.view(), &zones, 1, 0.0);
    assert_eq!(s.revealed_fraction(), 0.0);
}
