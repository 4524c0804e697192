use proptest::prelude::*;
use rtree::Rect;

/// Rect constructor for tests working with known-good coordinates
pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect<f64> {
    Rect::new(min_x, min_y, max_x, max_y).expect("test rectangle")
}

/// Rectangles with small integer coordinates. The coarse grid keeps areas
/// and enlargements colliding often, which exercises every tie-break.
#[allow(dead_code)]
pub fn arb_rect() -> impl Strategy<Value = Rect<f64>> {
    (0u16..48, 0u16..48, 0u16..8, 0u16..8).prop_map(|(x, y, w, h)| {
        rect(
            f64::from(x),
            f64::from(y),
            f64::from(x + w),
            f64::from(y + h),
        )
    })
}

#[allow(dead_code)]
pub fn arb_rects(max_len: usize) -> impl Strategy<Value = Vec<Rect<f64>>> {
    prop::collection::vec(arb_rect(), 0..max_len)
}
