#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use rand::prelude::SmallRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    use sheetnest::entities::{
        Layout, MaterialSurface, Part, PartInput, PlacedPart, RotationPolicy, UnplacedReason,
    };
    use sheetnest::error::PackingError;
    use sheetnest::geometry::{PlacementTransform, Rect};
    use sheetnest::io::ext_repr::ExtMask;
    use sheetnest::io::svg::{PARTS_GROUP_ID, compose_nesting_document};
    use sheetnest::mask::{AvailabilityMask, CellRect, CellScale, HaloSpec, Occupancy, Rejection};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn part_input(id: &str, width: f64, height: f64) -> PartInput {
        PartInput {
            id: id.to_string(),
            width,
            height,
            fragment: format!("<rect width=\"{width}\" height=\"{height}\"/>"),
        }
    }

    fn full_mask(width: usize, height: usize) -> AvailabilityMask {
        AvailabilityMask::from_bools(width, height, &vec![true; width * height]).unwrap()
    }

    #[test_case(0.0, 0.0, 10.0, 10.0, 5.0, 5.0, true; "interiors intersect")]
    #[test_case(0.0, 0.0, 10.0, 10.0, 10.0, 0.0, false; "shared edge")]
    #[test_case(0.0, 0.0, 10.0, 10.0, 10.0, 10.0, false; "shared corner")]
    #[test_case(0.0, 0.0, 10.0, 10.0, 20.0, 20.0, false; "disjoint")]
    fn rect_overlap(x1: f64, y1: f64, w: f64, h: f64, x2: f64, y2: f64, expected: bool) {
        let a = Rect::from_origin(x1, y1, w, h).unwrap();
        let b = Rect::from_origin(x2, y2, w, h).unwrap();
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test_case(0.0, 100.0; "zero width")]
    #[test_case(100.0, -1.0; "negative height")]
    #[test_case(f64::NAN, 100.0; "nan width")]
    #[test_case(f64::INFINITY, 100.0; "infinite width")]
    fn surface_rejects_invalid_extent(width: f64, height: f64) {
        let err = MaterialSurface::new(width, height).unwrap_err();
        assert!(matches!(err, PackingError::InvalidSurface { .. }));
    }

    #[test]
    fn surface_deserialization_is_validated() {
        let ok: MaterialSurface = serde_json::from_str(r#"{"width": 10, "height": 20}"#).unwrap();
        assert_eq!(ok.area(), 200.0);
        assert!(serde_json::from_str::<MaterialSurface>(r#"{"width": 0, "height": 20}"#).is_err());
    }

    #[test_case(RotationPolicy::None, (300.0, 400.0), (1000.0, 500.0), Some(0.0); "none keeps portrait")]
    #[test_case(RotationPolicy::RightAngle, (300.0, 400.0), (1000.0, 500.0), Some(90.0); "right angle turns portrait")]
    #[test_case(RotationPolicy::RightAngle, (600.0, 300.0), (400.0, 1000.0), Some(90.0); "right angle turns when only turned fits")]
    #[test_case(RotationPolicy::Free, (300.0, 600.0), (1000.0, 500.0), Some(90.0); "free prefers landscape")]
    #[test_case(RotationPolicy::Free, (300.0, 600.0), (400.0, 1000.0), Some(0.0); "free falls back to portrait")]
    #[test_case(RotationPolicy::None, (300.0, 600.0), (1000.0, 500.0), None; "none cannot turn")]
    #[test_case(RotationPolicy::Free, (1200.0, 1100.0), (1000.0, 1000.0), None; "too big in both axes")]
    fn part_orientation(
        policy: RotationPolicy,
        size: (f64, f64),
        surface: (f64, f64),
        expected_rotation: Option<f64>,
    ) {
        let surface = MaterialSurface::new(surface.0, surface.1).unwrap();
        let input = part_input("p", size.0, size.1);
        match (Part::prepare(0, &input, policy, 0.0, &surface), expected_rotation) {
            (Ok(part), Some(rotation)) => {
                assert_eq!(part.rotation, rotation);
                assert!(surface.fits(part.footprint));
            }
            (Err(unplaced), None) => assert_eq!(unplaced.reason, UnplacedReason::ExceedsSurface),
            (result, expected) => panic!("unexpected {result:?} for {expected:?}"),
        }
    }

    #[test]
    fn part_inflation_excludes_spacing_from_base_area() {
        let surface = MaterialSurface::new(1000.0, 1000.0).unwrap();
        let part = Part::prepare(
            3,
            &part_input("p", 100.0, 50.0),
            RotationPolicy::None,
            10.0,
            &surface,
        )
        .unwrap();
        assert_eq!(part.footprint, (120.0, 70.0));
        assert_eq!(part.base_area, 5000.0);
        assert_eq!(part.index, 3);
    }

    #[test_case(0.0, 50.0; "zero width")]
    #[test_case(f64::NAN, 50.0; "nan width")]
    fn degenerate_part_is_unplaced(width: f64, height: f64) {
        let surface = MaterialSurface::new(1000.0, 1000.0).unwrap();
        let result = Part::prepare(
            0,
            &part_input("p", width, height),
            RotationPolicy::RightAngle,
            0.0,
            &surface,
        );
        assert_eq!(result.unwrap_err().reason, UnplacedReason::ExceedsSurface);
    }

    #[test]
    fn layout_rejects_double_placement() {
        init_logger();
        let surface = MaterialSurface::new(100.0, 100.0).unwrap();
        let part = Part::prepare(
            0,
            &part_input("p", 50.0, 50.0),
            RotationPolicy::None,
            0.0,
            &surface,
        )
        .unwrap();
        let mut layout = Layout::new(surface);
        layout.place(&part, (0.0, 0.0)).unwrap();

        let (_, region) = layout.regions().next().unwrap();
        assert!(!layout.is_admissible(&region.rect));
        assert!(layout.is_admissible(&Rect::from_origin(50.0, 0.0, 50.0, 50.0).unwrap()));
        assert!(!layout.is_admissible(&Rect::from_origin(49.0, 0.0, 50.0, 50.0).unwrap()));
        assert!(!layout.fits_within_surface(&Rect::from_origin(60.0, 0.0, 50.0, 50.0).unwrap()));
        assert!(approx_eq!(f64, layout.utilization(), 0.25));
    }

    #[test]
    fn quarter_turn_lands_content_inside_footprint() {
        let transform = PlacementTransform::about_center((10.0, 20.0), (40.0, 20.0), 90.0);
        let corners = [(0.0, 0.0), (40.0, 0.0), (0.0, 20.0), (40.0, 20.0)].map(|c| transform.apply(c));

        let x_min = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let x_max = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let y_min = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let y_max = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

        assert!(approx_eq!(f64, x_min, 10.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, x_max, 30.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, y_min, 20.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, y_max, 60.0, epsilon = 1e-9));
        assert_eq!(transform.to_string(), "translate(0 30) rotate(90 20 10)");
    }

    #[test]
    fn unrotated_transform_is_plain_translation() {
        let transform = PlacementTransform::about_center((5.0, 7.0), (40.0, 20.0), 0.0);
        assert!(!transform.is_rotated());
        assert_eq!(transform.apply((0.0, 0.0)), (5.0, 7.0));
        assert_eq!(transform.to_string(), "translate(5 7)");
    }

    #[test]
    fn document_groups_parts_with_transforms() {
        let surface = MaterialSurface::new(1000.0, 1000.0).unwrap();
        let part = Part::prepare(
            0,
            &part_input("p1", 300.0, 400.0),
            RotationPolicy::RightAngle,
            5.0,
            &surface,
        )
        .unwrap();
        let placed = PlacedPart::new(&part, Rect::from_origin(0.0, 0.0, 410.0, 310.0).unwrap());
        let document = compose_nesting_document(&surface, None, &[placed.clone()]).to_string();

        assert!(document.contains(PARTS_GROUP_ID));
        assert!(document.contains("data-part-id=\"p1\""));
        assert!(document.contains(&placed.transform.to_string()));
        assert!(document.contains("rotate(90"));
        assert!(document.contains("<rect width=\"300\" height=\"400\"/>"));
    }

    #[test_case(200, false; "threshold is exclusive")]
    #[test_case(201, true; "just above threshold")]
    #[test_case(0, false; "black")]
    #[test_case(255, true; "white")]
    fn luminance_threshold(value: u8, usable: bool) {
        let mask = AvailabilityMask::from_luminance(1, 1, &[value]).unwrap();
        assert_eq!(mask.is_available(0, 0), usable);
        assert_eq!(mask.is_obstacle(0, 0), !usable);
    }

    #[test]
    fn mask_length_mismatch_is_reported() {
        let err = AvailabilityMask::from_luminance(4, 4, &[255; 15]).unwrap_err();
        assert_eq!(
            err,
            PackingError::MaskLengthMismatch {
                width: 4,
                height: 4,
                expected: 16,
                actual: 15
            }
        );
        let mask = full_mask(4, 4);
        assert!(mask.with_obstacle_luminance(&[255; 3]).is_err());
    }

    #[test]
    fn obstacle_bitmap_separates_preexisting_items() {
        let ext = ExtMask {
            width: 2,
            height: 2,
            cells: vec![255, 0, 0, 255],
            obstacle_cells: Some(vec![255, 255, 0, 255]),
        };
        let mask = ext.to_mask().unwrap();
        assert_eq!(mask.occupancy(1, 0), Occupancy::Placed);
        assert!(!mask.is_obstacle(1, 0));
        assert!(mask.is_obstacle(0, 1));
        assert_eq!(mask.occupancy(0, 1), Occupancy::Free);
        assert!(mask.is_available(0, 0));
    }

    #[test_case((100, 100), (100.0, 100.0), 20.0, 20; "unit scale")]
    #[test_case((200, 100), (100.0, 100.0), 20.0, 40; "two cells per unit")]
    #[test_case((100, 100), (1000.0, 1000.0), 1.0, 1; "floored at one cell")]
    fn cell_scale_conversion(cells: (usize, usize), physical: (f64, f64), v: f64, expected: usize) {
        let scale = CellScale::from_extent(cells, physical).unwrap();
        assert_eq!(scale.len_x(v), expected);
    }

    #[test]
    fn cell_scale_rejects_zero_extent() {
        assert!(matches!(
            CellScale::from_extent((10, 10), (0.0, 10.0)),
            Err(PackingError::InvalidScale(_))
        ));
        assert_eq!(CellScale::new(1.0, 1.0).unwrap().gap_x(0.4), 0);
    }

    #[test]
    fn coverage_tolerates_minor_obstacles() {
        let mut cells = vec![true; 100];
        cells[2 * 10 + 2] = false;
        let mask = AvailabilityMask::from_bools(10, 10, &cells).unwrap();
        let rect = CellRect::new(0, 0, 4, 4);
        let halo = HaloSpec::default();

        assert!(approx_eq!(f64, mask.coverage(&rect), 15.0 / 16.0));
        assert_eq!(mask.validate(&rect, &halo, 0.9), Ok(()));
        assert_eq!(mask.validate(&rect, &halo, 0.95), Err(Rejection::Coverage));
    }

    #[test]
    fn obstacle_gap_applies_when_neighbor_gap_is_zero() {
        let cells = (0..100).map(|i| i % 10 != 0).collect::<Vec<_>>();
        let mut mask = AvailabilityMask::from_bools(10, 10, &cells).unwrap();
        let halo = HaloSpec {
            neighbor_x: 0,
            neighbor_y: 0,
            obstacle_x: 1,
            obstacle_y: 1,
        };

        assert_eq!(
            mask.validate(&CellRect::new(1, 0, 3, 3), &halo, 0.0),
            Err(Rejection::Halo)
        );
        assert_eq!(mask.validate(&CellRect::new(2, 0, 3, 3), &halo, 0.0), Ok(()));

        //items may abut each other
        mask.commit(&CellRect::new(2, 0, 3, 3), &halo).unwrap();
        assert_eq!(mask.validate(&CellRect::new(5, 0, 3, 3), &halo, 1.0), Ok(()));
    }

    #[test]
    fn neighbor_gap_is_enforced_once() {
        let mut mask = full_mask(20, 10);
        let halo = HaloSpec {
            neighbor_x: 2,
            neighbor_y: 2,
            obstacle_x: 0,
            obstacle_y: 0,
        };
        mask.commit(&CellRect::new(0, 0, 5, 5), &halo).unwrap();

        assert_eq!(mask.occupancy(5, 0), Occupancy::Halo);
        assert_eq!(mask.occupancy(6, 4), Occupancy::Halo);
        assert_eq!(mask.occupancy(7, 0), Occupancy::Free);
        assert_eq!(
            mask.validate(&CellRect::new(6, 0, 5, 5), &halo, 1.0),
            Err(Rejection::Overlap)
        );
        assert_eq!(mask.validate(&CellRect::new(7, 0, 5, 5), &halo, 1.0), Ok(()));
    }

    #[test]
    fn diagonal_neighbours_may_touch_corners() {
        let mut mask = full_mask(30, 30);
        let halo = HaloSpec {
            neighbor_x: 2,
            neighbor_y: 2,
            obstacle_x: 0,
            obstacle_y: 0,
        };
        mask.commit(&CellRect::new(0, 0, 10, 10), &halo).unwrap();

        assert_eq!(mask.occupancy(10, 10), Occupancy::Free);
        assert!(mask.halo_is_clear(&CellRect::new(10, 10, 10, 10), &halo));
        assert_eq!(mask.validate(&CellRect::new(10, 10, 10, 10), &halo, 1.0), Ok(()));
        assert_eq!(
            mask.validate(&CellRect::new(10, 9, 10, 10), &halo, 1.0),
            Err(Rejection::Overlap)
        );
    }

    #[test]
    fn failed_commit_leaves_mask_untouched() {
        let mut mask = full_mask(10, 10);
        let halo = HaloSpec::default();
        mask.commit(&CellRect::new(0, 0, 5, 5), &halo).unwrap();

        assert_eq!(
            mask.commit(&CellRect::new(4, 4, 3, 3), &halo),
            Err(Rejection::Overlap)
        );
        assert_eq!(
            mask.commit(&CellRect::new(8, 8, 3, 3), &halo),
            Err(Rejection::OutOfBounds)
        );
        assert_eq!(mask.n_committed(), 1);
        assert_eq!(mask.occupancy(6, 6), Occupancy::Free);
        assert!(mask.is_available(9, 9));
    }

    #[test_case(0; "zero gap")]
    #[test_case(1; "unit gap")]
    #[test_case(3; "wide gap")]
    fn random_commits_never_overlap(gap: usize) {
        let mut rng = SmallRng::seed_from_u64(gap as u64);
        let mut mask = full_mask(60, 60);
        let halo = HaloSpec {
            neighbor_x: gap,
            neighbor_y: gap,
            obstacle_x: 1,
            obstacle_y: 1,
        };
        let mut committed: Vec<CellRect> = vec![];

        for _ in 0..500 {
            let rect = CellRect::new(
                rng.random_range(0..60),
                rng.random_range(0..60),
                rng.random_range(1..15),
                rng.random_range(1..15),
            );
            if mask.validate(&rect, &halo, 1.0).is_ok() {
                mask.commit(&rect, &halo).unwrap();
                assert!(mask.validate(&rect, &halo, 0.0).is_err());
                committed.push(rect);
            }
        }

        assert!(!committed.is_empty());
        assert_eq!(mask.n_committed(), committed.len());
        for (i, a) in committed.iter().enumerate() {
            for b in &committed[i + 1..] {
                let x_apart = a.x_max() + gap <= b.x || b.x_max() + gap <= a.x;
                let y_apart = a.y_max() + gap <= b.y || b.y_max() + gap <= a.y;
                let x_disjoint = a.x_max() <= b.x || b.x_max() <= a.x;
                let y_disjoint = a.y_max() <= b.y || b.y_max() <= a.y;
                assert!(x_disjoint || y_disjoint, "{a} overlaps {b}");
                //side by side rectangles keep the neighbor gap
                assert!(x_apart || y_apart || (x_disjoint && y_disjoint), "{a} too close to {b}");
            }
        }
    }
}
