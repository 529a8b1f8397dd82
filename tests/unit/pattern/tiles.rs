use super::*;
use crate::foundation::random::seeded;

fn canvas() -> Canvas {
    Canvas {
        width: 1200,
        height: 628,
    }
}

#[test]
fn grid_dimensions_round_up() {
    let overlay = generate_tiles(canvas(), &TileGridParameters::default(), &mut seeded(1)).unwrap();
    assert_eq!((overlay.cols, overlay.rows), (12, 7));
}

#[test]
fn density_zero_places_nothing_for_every_mode() {
    for shape in [TileShape::Square, TileShape::Circle] {
        for clustering in [false, true] {
            let params = TileGridParameters {
                tile_size: 100,
                density: 0.0,
                clustering,
                shape,
                ..TileGridParameters::default()
            };
            let overlay = generate_tiles(canvas(), &params, &mut seeded(3)).unwrap();
            assert!(overlay.is_empty(), "{shape:?} clustering={clustering}");
        }
    }
}

#[test]
fn density_one_places_every_cell() {
    let params = TileGridParameters {
        density: 1.0,
        ..TileGridParameters::default()
    };
    let overlay = generate_tiles(canvas(), &params, &mut seeded(4)).unwrap();
    assert_eq!(overlay.len(), 12 * 7);
    for y in 0..7 {
        for x in 0..12 {
            assert!(overlay.is_placed(x, y));
        }
    }
}

#[test]
fn same_seed_same_overlay() {
    let params = TileGridParameters {
        density: 0.4,
        variation_percent: 30,
        clustering: true,
        ..TileGridParameters::default()
    };
    let a = generate_tiles(canvas(), &params, &mut seeded(99)).unwrap();
    let b = generate_tiles(canvas(), &params, &mut seeded(99)).unwrap();
    let c = generate_tiles(canvas(), &params, &mut seeded(100)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn tiles_are_emitted_in_row_major_order() {
    let params = TileGridParameters {
        density: 0.5,
        ..TileGridParameters::default()
    };
    let overlay = generate_tiles(canvas(), &params, &mut seeded(8)).unwrap();
    let keys: Vec<(u32, u32)> = overlay.tiles.iter().map(|t| (t.grid_y, t.grid_x)).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}

#[test]
fn squares_sit_on_cell_centers_with_centered_grid() {
    let params = TileGridParameters {
        density: 1.0,
        ..TileGridParameters::default()
    };
    let overlay = generate_tiles(canvas(), &params, &mut seeded(2)).unwrap();
    // 7 rows * 100 = 700 overflows 628 by 72 -> grid starts at y = -36.
    let first = overlay.tiles[0];
    assert_eq!(first.center, Point::new(50.0, 14.0));
    assert_eq!(first.size_px, 100.0);

    let top = TileGridParameters {
        alignment: GridAlignment::Top,
        ..params
    };
    let overlay = generate_tiles(canvas(), &top, &mut seeded(2)).unwrap();
    assert_eq!(overlay.tiles[0].center, Point::new(50.0, 50.0));
}

#[test]
fn circles_use_ninety_percent_diameter() {
    let params = TileGridParameters {
        density: 1.0,
        shape: TileShape::Circle,
        ..TileGridParameters::default()
    };
    let overlay = generate_tiles(canvas(), &params, &mut seeded(2)).unwrap();
    assert!(overlay.tiles.iter().all(|t| (t.size_px - 90.0).abs() < 1e-9));
    assert!(overlay.tiles.iter().all(|t| t.shape == TileShape::Circle));
}

#[test]
fn size_variation_stays_within_bounds() {
    let params = TileGridParameters {
        density: 1.0,
        variation_percent: 25,
        ..TileGridParameters::default()
    };
    let overlay = generate_tiles(canvas(), &params, &mut seeded(5)).unwrap();
    assert!(overlay.tiles.iter().all(|t| (75.0..=125.0).contains(&t.size_px)));
    assert!(overlay.tiles.iter().any(|t| t.size_px != 100.0));
}

#[test]
fn oversized_variation_never_yields_negative_sizes() {
    let params = TileGridParameters {
        density: 1.0,
        variation_percent: 400,
        ..TileGridParameters::default()
    };
    let overlay = generate_tiles(canvas(), &params, &mut seeded(6)).unwrap();
    assert!(overlay.tiles.iter().all(|t| t.size_px >= 0.0));
    assert!(overlay.tiles.iter().any(|t| t.size_px == 0.0));
}

#[test]
fn colors_come_from_the_palette() {
    let palette = vec![Rgb8::new(1, 2, 3), Rgb8::new(4, 5, 6)];
    let params = TileGridParameters {
        density: 1.0,
        palette: palette.clone(),
        ..TileGridParameters::default()
    };
    let overlay = generate_tiles(canvas(), &params, &mut seeded(7)).unwrap();
    assert!(overlay.tiles.iter().all(|t| palette.contains(&t.color)));
    for c in &palette {
        assert!(overlay.tiles.iter().any(|t| t.color == *c));
    }
}

#[test]
fn invalid_parameters_are_rejected() {
    let bad = [
        TileGridParameters {
            tile_size: 0,
            ..TileGridParameters::default()
        },
        TileGridParameters {
            density: 1.5,
            ..TileGridParameters::default()
        },
        TileGridParameters {
            density: f64::NAN,
            ..TileGridParameters::default()
        },
        TileGridParameters {
            palette: vec![],
            ..TileGridParameters::default()
        },
    ];
    for params in bad {
        let err = generate_tiles(canvas(), &params, &mut seeded(0)).unwrap_err();
        assert!(matches!(err, PosterError::Parameter(_)), "{err}");
    }
}

fn left_neighbor_rate(clustering: bool) -> f64 {
    let params = TileGridParameters {
        tile_size: 1,
        density: 0.1,
        clustering,
        ..TileGridParameters::default()
    };
    let grid = Canvas {
        width: 100,
        height: 100,
    };
    let mut with_left = 0u32;
    let mut placed_with_left = 0u32;
    for seed in 0..4 {
        let overlay = generate_tiles(grid, &params, &mut seeded(seed)).unwrap();
        let mut cells = vec![false; 100 * 100];
        for t in &overlay.tiles {
            cells[(t.grid_y * 100 + t.grid_x) as usize] = true;
        }
        for y in 0..100usize {
            for x in 1..100usize {
                if cells[y * 100 + x - 1] {
                    with_left += 1;
                    if cells[y * 100 + x] {
                        placed_with_left += 1;
                    }
                }
            }
        }
    }
    f64::from(placed_with_left) / f64::from(with_left)
}

#[test]
fn clustering_raises_placement_next_to_placed_cells() {
    let clustered = left_neighbor_rate(true);
    let independent = left_neighbor_rate(false);
    assert!((clustered - 0.3).abs() < 0.04, "clustered rate {clustered}");
    assert!((independent - 0.1).abs() < 0.03, "independent rate {independent}");
    assert!(clustered > independent + 0.1);
}
