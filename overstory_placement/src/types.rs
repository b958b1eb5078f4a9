// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for placement resolution: placements, snapshots, options, results.

use kurbo::{Point, Rect, Size};

/// Default gap, in pixels, between the anchor's edge and the overlay.
pub const DEFAULT_MARGIN: f64 = 8.0;

/// Logical side (or corner) of the anchor where the overlay is rendered.
///
/// The four cardinal placements center the overlay along the anchor's
/// cross-axis. The four corner placements attach to the anchor's top or
/// bottom edge and align the overlay's matching vertical edge with the
/// anchor's (for example [`TopRight`](Self::TopRight) aligns right edges).
///
/// Fallback ordering when a placement lacks space is defined by
/// [`fallback_candidates`](crate::resolve::fallback_candidates).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Placement {
    /// Above the anchor, horizontally centered.
    Top,
    /// Below the anchor, horizontally centered.
    Bottom,
    /// Left of the anchor, vertically centered.
    Left,
    /// Right of the anchor, vertically centered.
    Right,
    /// Above the anchor, left edges aligned.
    TopLeft,
    /// Above the anchor, right edges aligned.
    TopRight,
    /// Below the anchor, left edges aligned.
    BottomLeft,
    /// Below the anchor, right edges aligned.
    BottomRight,
}

impl Placement {
    /// The four cardinal placements, in declaration order.
    pub const CARDINALS: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Whether this is a corner placement.
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    /// The cardinal edge this placement attaches to (identity for cardinals).
    pub const fn cardinal(self) -> Self {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Self::Top,
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Self::Bottom,
            Self::Left => Self::Left,
            Self::Right => Self::Right,
        }
    }

    /// The placement on the opposite side of the anchor.
    ///
    /// Corners flip across their attaching edge and keep their horizontal
    /// alignment (`TopLeft` → `BottomLeft`).
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::TopLeft => Self::BottomLeft,
            Self::TopRight => Self::BottomRight,
            Self::BottomLeft => Self::TopLeft,
            Self::BottomRight => Self::TopRight,
        }
    }

    /// The corner sharing this corner's attaching edge, with the opposite
    /// alignment (`TopLeft` → `TopRight`). Identity for cardinals.
    pub const fn mirrored_along_edge(self) -> Self {
        match self {
            Self::TopLeft => Self::TopRight,
            Self::TopRight => Self::TopLeft,
            Self::BottomLeft => Self::BottomRight,
            Self::BottomRight => Self::BottomLeft,
            other => other,
        }
    }

    /// Whether the overlay sits above or below the anchor (primary axis
    /// vertical). Corner placements always attach vertically.
    pub const fn is_vertical(self) -> bool {
        !matches!(self, Self::Left | Self::Right)
    }
}

/// An immutable capture of all rectangles needed for one placement
/// resolution.
///
/// All rectangles are viewport-relative pixels. The snapshot is captured
/// fresh for every resolution and never mutated. `overlay` is the overlay's
/// natural (unplaced) bounding box: it is measured only after the overlay has
/// been mounted invisibly, so only its width and height are consulted.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometrySnapshot {
    /// Bounding box of the anchor element.
    pub anchor: Rect,
    /// Natural bounding box of the overlay (only its size is used).
    pub overlay: Rect,
    /// Size of the logical viewport.
    pub viewport: Size,
    /// Bounding box of the anchor's scroll container, when one exists.
    pub scroll_container: Option<Rect>,
}

impl GeometrySnapshot {
    /// Available space from the anchor's edge to the viewport edge in the
    /// given cardinal direction (corners report their attaching edge).
    pub fn space(&self, placement: Placement) -> f64 {
        match placement.cardinal() {
            Placement::Bottom => self.viewport.height - self.anchor.y1,
            Placement::Left => self.anchor.x0,
            Placement::Right => self.viewport.width - self.anchor.x1,
            // `cardinal` collapses the remaining variants onto `Top`.
            _ => self.anchor.y0,
        }
    }

    /// Whether the anchor still intersects its scroll container.
    ///
    /// Always true when the snapshot has no scroll container. Touching edges
    /// count as intersecting.
    pub fn anchor_in_container(&self) -> bool {
        let Some(container) = self.scroll_container else {
            return true;
        };
        let a = self.anchor;
        !(a.y1 < container.y0 || a.y0 > container.y1 || a.x1 < container.x0 || a.x0 > container.x1)
    }
}

/// Tunables for [`resolve`](crate::resolve::resolve).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolveOptions {
    /// Consider corner placements when the preferred placement is a corner.
    pub allow_corners: bool,
    /// Gap between the anchor's edge and the overlay along the primary axis.
    pub margin: f64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            allow_corners: false,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Outcome of one placement resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// The chosen placement. Always a member of the fallback-candidate list
    /// for the requested starting placement.
    pub placement: Placement,
    /// Viewport-relative top-left corner for the overlay.
    pub origin: Point,
}

impl Resolution {
    /// The overlay's bounding box at the resolved position.
    pub fn overlay_box(&self, snapshot: &GeometrySnapshot) -> Rect {
        Rect::from_origin_size(self.origin, snapshot.overlay.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_of_corners() {
        assert_eq!(Placement::TopLeft.cardinal(), Placement::Top);
        assert_eq!(Placement::TopRight.cardinal(), Placement::Top);
        assert_eq!(Placement::BottomLeft.cardinal(), Placement::Bottom);
        assert_eq!(Placement::BottomRight.cardinal(), Placement::Bottom);
        for c in Placement::CARDINALS {
            assert_eq!(c.cardinal(), c);
        }
    }

    #[test]
    fn opposite_is_involutive() {
        use Placement::*;
        for p in [
            Top,
            Bottom,
            Left,
            Right,
            TopLeft,
            TopRight,
            BottomLeft,
            BottomRight,
        ] {
            assert_eq!(p.opposite().opposite(), p);
        }
    }

    #[test]
    fn mirror_along_edge_keeps_edge() {
        assert_eq!(Placement::TopLeft.mirrored_along_edge(), Placement::TopRight);
        assert_eq!(
            Placement::BottomRight.mirrored_along_edge(),
            Placement::BottomLeft
        );
        assert_eq!(Placement::Top.mirrored_along_edge(), Placement::Top);
    }

    #[test]
    fn space_per_direction() {
        let snapshot = GeometrySnapshot {
            anchor: Rect::new(100.0, 50.0, 160.0, 80.0),
            overlay: Rect::new(0.0, 0.0, 40.0, 20.0),
            viewport: Size::new(800.0, 600.0),
            scroll_container: None,
        };
        assert_eq!(snapshot.space(Placement::Top), 50.0);
        assert_eq!(snapshot.space(Placement::Bottom), 520.0);
        assert_eq!(snapshot.space(Placement::Left), 100.0);
        assert_eq!(snapshot.space(Placement::Right), 640.0);
        // Corners report their attaching edge.
        assert_eq!(snapshot.space(Placement::TopRight), 50.0);
        assert_eq!(snapshot.space(Placement::BottomLeft), 520.0);
    }

    #[test]
    fn anchor_in_container_intersection() {
        let mut snapshot = GeometrySnapshot {
            anchor: Rect::new(10.0, 10.0, 60.0, 30.0),
            overlay: Rect::ZERO,
            viewport: Size::new(800.0, 600.0),
            scroll_container: Some(Rect::new(0.0, 0.0, 200.0, 200.0)),
        };
        assert!(snapshot.anchor_in_container());

        // Scrolled fully above the container.
        snapshot.anchor = Rect::new(10.0, -50.0, 60.0, -10.0);
        assert!(!snapshot.anchor_in_container());

        // Touching edges still count as intersecting.
        snapshot.anchor = Rect::new(10.0, -20.0, 60.0, 0.0);
        assert!(snapshot.anchor_in_container());

        // No container: always in view.
        snapshot.scroll_container = None;
        snapshot.anchor = Rect::new(-500.0, -500.0, -400.0, -450.0);
        assert!(snapshot.anchor_in_container());
    }
}
