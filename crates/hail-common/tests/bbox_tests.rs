//! Tests for BoundingBox operations on planar and geographic extents.

use hail_common::BoundingBox;

// ============================================================================
// Dimension tests
// ============================================================================

#[test]
fn test_bbox_dimensions_projected() {
    // Roughly the contiguous US in EPSG:2163 meters
    let bbox = BoundingBox::new(-2_031_000.0, -2_116_000.0, 2_516_000.0, 732_000.0);
    assert_eq!(bbox.width(), 4_547_000.0);
    assert_eq!(bbox.height(), 2_848_000.0);
}

#[test]
fn test_bbox_center() {
    let bbox = BoundingBox::new(-10.0, -4.0, 10.0, 6.0);
    assert_eq!(bbox.center(), (0.0, 1.0));
}

// ============================================================================
// Validity tests
// ============================================================================

#[test]
fn test_bbox_validity() {
    assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_valid());
    assert!(!BoundingBox::new(0.0, 0.0, 0.0, 1.0).is_valid());
    assert!(!BoundingBox::new(5.0, 5.0, 1.0, 1.0).is_valid());
    assert!(!BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
    assert!(!BoundingBox::new(0.0, 0.0, f64::INFINITY, 1.0).is_valid());
}

// ============================================================================
// Containment tests
// ============================================================================

#[test]
fn test_contains_point_edges_inclusive() {
    let bbox = BoundingBox::new(0.0, 0.0, 30.0, 20.0);
    assert!(bbox.contains_point(0.0, 0.0));
    assert!(bbox.contains_point(30.0, 20.0));
    assert!(bbox.contains_point(15.0, 10.0));
    assert!(!bbox.contains_point(30.000001, 10.0));
    assert!(!bbox.contains_point(15.0, -0.000001));
}

#[test]
fn test_intersects_requires_overlap() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
    let touching = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
    assert!(a.intersects(&b));
    assert!(!a.intersects(&touching));
}

// ============================================================================
// Union tests
// ============================================================================

#[test]
fn test_enclosing_many() {
    let boxes = vec![
        BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        BoundingBox::new(-3.0, 2.0, -2.0, 4.0),
        BoundingBox::new(5.0, -1.0, 6.0, 0.0),
    ];
    let all = BoundingBox::enclosing(boxes).unwrap();
    assert_eq!(all, BoundingBox::new(-3.0, -1.0, 6.0, 4.0));
}
