use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn darken_full_is_black_and_zero_is_noop() {
    let px = [200, 100, 50, 255];
    assert_eq!(darken(px, 1.0), [0, 0, 0, 255]);
    assert_eq!(darken(px, 0.0), px);
    let half = darken(px, 0.5);
    assert!(half[0] > 90 && half[0] < 110);
    assert_eq!(half[3], 255);
}

#[test]
fn unpremultiply_inverts_premultiplied_colors() {
    assert_eq!(unpremultiply([128, 64, 0, 128]), [255, 128, 0, 128]);
    assert_eq!(unpremultiply([10, 10, 10, 0]), [0, 0, 0, 0]);
    assert_eq!(unpremultiply([7, 8, 9, 255]), [7, 8, 9, 255]);
}
