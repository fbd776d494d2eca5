//! Bounding box of a layout and the canvas it maps onto.

use skilltree_graph::Position;

/// Axis-aligned bounds of every positioned node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Scan positions. No positions gives all-zero bounds.
    pub fn of<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut iter = positions.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };

        iter.fold(
            Self {
                min_x: first.x,
                max_x: first.x,
                min_y: first.y,
                max_y: first.y,
            },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Canvas size and the offset that moves layout space into it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    /// Fit a canvas around `bounds` with `padding` on every side.
    pub fn fit(bounds: &Bounds, padding: f64) -> Self {
        Self {
            width: bounds.width() + padding * 2.0,
            height: bounds.height() + padding * 2.0,
            offset_x: -bounds.min_x + padding,
            offset_y: -bounds.min_y + padding,
        }
    }

    /// Translate a layout position into canvas coordinates.
    pub fn to_canvas(&self, p: Position) -> Position {
        Position::new(p.x + self.offset_x, p.y + self.offset_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bounds_are_zero() {
        assert_eq!(Bounds::of(std::iter::empty()), Bounds::default());
    }

    #[test]
    fn bounds_cover_all_points() {
        let points = [
            Position::new(0.0, 0.0),
            Position::new(-50.0, 160.0),
            Position::new(200.0, 320.0),
        ];
        let b = Bounds::of(points);
        assert_eq!(b.min_x, -50.0);
        assert_eq!(b.max_x, 200.0);
        assert_eq!(b.min_y, 0.0);
        assert_eq!(b.max_y, 320.0);
        for p in points {
            assert!(b.contains(p));
        }
    }

    #[test]
    fn viewport_pads_and_offsets() {
        let b = Bounds {
            min_x: 0.0,
            max_x: 100.0,
            min_y: 0.0,
            max_y: 160.0,
        };
        let v = Viewport::fit(&b, 30.0);
        assert_eq!(v.width, 160.0);
        assert_eq!(v.height, 220.0);
        assert_eq!(v.to_canvas(Position::ORIGIN), Position::new(30.0, 30.0));
    }

    #[test]
    fn viewport_shifts_negative_min() {
        let b = Bounds {
            min_x: -20.0,
            max_x: 20.0,
            min_y: 0.0,
            max_y: 0.0,
        };
        let v = Viewport::fit(&b, 10.0);
        assert_eq!(v.to_canvas(Position::new(-20.0, 0.0)), Position::new(10.0, 10.0));
    }
}
