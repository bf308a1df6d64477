use serde::{Deserialize, Deserializer, Serialize};

/// An axis-aligned rectangle: top-left origin plus size.
///
/// Y grows downward, so `y` is the top edge and `y + height` the bottom.
/// On the wire the fields are spelled `X`, `Y`, `Width`, `Height` and
/// `Time`; lowercase spellings are accepted on input and missing numbers
/// read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rectangle {
    #[serde(rename = "X", alias = "x")]
    pub x: i32,
    #[serde(rename = "Y", alias = "y")]
    pub y: i32,
    #[serde(rename = "Width", alias = "width")]
    pub width: i32,
    #[serde(rename = "Height", alias = "height")]
    pub height: i32,
    /// When the rectangle was accepted as an overlap. Absent on input.
    #[serde(
        rename = "Time",
        alias = "time",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub observed_at: Option<String>,
}

/// A point in the rectangle's coordinate space.
///
/// Coordinates are widened to `i64` so `x + width` never overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// A rectangle expressed by its diagonal corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerPair {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            observed_at: None,
        }
    }

    /// Returns a copy stamped with the given observation time.
    pub fn observed(&self, at: impl Into<String>) -> Self {
        Self {
            observed_at: Some(at.into()),
            ..self.clone()
        }
    }

    /// Zero width or zero height: a line or a point.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether either dimension is negative.
    ///
    /// The overlap test is undefined for such rectangles; the request
    /// boundary rejects them before they reach the matcher.
    pub fn has_negative_dimension(&self) -> bool {
        self.width < 0 || self.height < 0
    }

    pub fn corners(&self) -> CornerPair {
        to_corners(self)
    }
}

/// Converts a rectangle into its top-left / bottom-right corner form.
///
/// No validation: a negative width or height yields a bottom-right corner
/// left of or above the top-left one.
pub fn to_corners(rect: &Rectangle) -> CornerPair {
    let (x, y) = (i64::from(rect.x), i64::from(rect.y));
    CornerPair {
        top_left: Point { x, y },
        bottom_right: Point {
            x: x + i64::from(rect.width),
            y: y + i64::from(rect.height),
        },
    }
}

impl CornerPair {
    fn is_degenerate(&self) -> bool {
        self.top_left.x == self.bottom_right.x || self.top_left.y == self.bottom_right.y
    }
}

/// Returns whether two rectangles share interior area.
///
/// Rectangles that only touch along an edge or at a corner do not
/// overlap, and a degenerate rectangle overlaps nothing.
pub fn overlaps(a: &CornerPair, b: &CornerPair) -> bool {
    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }
    if a.top_left.x >= b.bottom_right.x || b.top_left.x >= a.bottom_right.x {
        return false;
    }
    if a.bottom_right.y <= b.top_left.y || b.bottom_right.y <= a.top_left.y {
        return false;
    }
    true
}

/// Go-style encoders send `"Time": ""` for an unset timestamp.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlap(a: Rectangle, b: Rectangle) -> bool {
        overlaps(&a.corners(), &b.corners())
    }

    #[test]
    fn corners_add_size_to_origin() {
        // Arrange
        let rect = Rectangle::new(3, 4, 10, 20);

        // Act
        let corners = to_corners(&rect);

        // Assert
        assert_eq!(corners.top_left, Point { x: 3, y: 4 });
        assert_eq!(corners.bottom_right, Point { x: 13, y: 24 });
    }

    #[test]
    fn corners_are_stable_across_calls() {
        let rect = Rectangle::new(-7, 2, 5, 9);

        assert_eq!(to_corners(&rect), to_corners(&rect));
    }

    #[test]
    fn negative_size_inverts_corners() {
        let corners = to_corners(&Rectangle::new(10, 10, -5, -5));

        assert_eq!(corners.bottom_right, Point { x: 5, y: 5 });
    }

    #[test]
    fn corners_do_not_overflow_at_extremes() {
        let corners = to_corners(&Rectangle::new(i32::MAX, i32::MAX, i32::MAX, 1));

        assert_eq!(corners.bottom_right.x, 2 * i64::from(i32::MAX));
    }

    #[test]
    fn shared_edge_is_not_overlap() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(10, 0, 10, 10);

        assert!(!overlap(a.clone(), b.clone()));
        assert!(!overlap(b, a));
    }

    #[test]
    fn shared_horizontal_edge_is_not_overlap() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(0, 10, 10, 10);

        assert!(!overlap(a, b));
    }

    #[test]
    fn shared_corner_is_not_overlap() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(10, 10, 10, 10);

        assert!(!overlap(a, b));
    }

    #[test]
    fn partial_intersection_overlaps() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(5, 5, 10, 10);

        assert!(overlap(a, b));
    }

    #[test]
    fn containment_overlaps() {
        let outer = Rectangle::new(0, 0, 20, 20);
        let inner = Rectangle::new(5, 5, 5, 5);

        assert!(overlap(outer.clone(), inner.clone()));
        assert!(overlap(inner, outer));
    }

    #[test]
    fn rectangle_overlaps_itself() {
        let a = Rectangle::new(-3, 8, 4, 1);

        assert!(overlap(a.clone(), a));
    }

    #[test]
    fn degenerate_rectangle_overlaps_nothing() {
        let line = Rectangle::new(0, 0, 0, 5);
        let point = Rectangle::new(2, 2, 0, 0);
        let big = Rectangle::new(-100, -100, 200, 200);

        assert!(!overlap(line.clone(), big.clone()));
        assert!(!overlap(big.clone(), line.clone()));
        assert!(!overlap(point.clone(), big));
        assert!(!overlap(line.clone(), line));
        assert!(!overlap(point.clone(), point));
    }

    #[test]
    fn disjoint_rectangles_do_not_overlap() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(20, 20, 5, 5);

        assert!(!overlap(a, b));
    }

    #[test]
    fn deserializes_go_style_fields() {
        // Arrange
        let json = r#"{"X":1,"Y":2,"Width":3,"Height":4,"Time":""}"#;

        // Act
        let rect: Rectangle = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(rect, Rectangle::new(1, 2, 3, 4));
    }

    #[test]
    fn deserializes_lowercase_fields() {
        let json = r#"{"x":1,"y":2,"width":3,"height":4}"#;

        let rect: Rectangle = serde_json::from_str(json).unwrap();

        assert_eq!(rect, Rectangle::new(1, 2, 3, 4));
    }

    #[test]
    fn serializes_time_only_when_present() {
        let plain = serde_json::to_string(&Rectangle::new(1, 2, 3, 4)).unwrap();
        let stamped =
            serde_json::to_string(&Rectangle::new(1, 2, 3, 4).observed("01-02-2006 15:04:05"))
                .unwrap();

        assert_eq!(plain, r#"{"X":1,"Y":2,"Width":3,"Height":4}"#);
        assert!(stamped.ends_with(r#""Time":"01-02-2006 15:04:05"}"#));
    }
}
