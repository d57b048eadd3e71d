use glassfx::dispersion::channel_coordinates;
use glassfx::displacement::NormalizedCoordinate;
use glassfx::gamma::GammaTable;
use glassfx::refraction::refraction_offset;
use glassfx::{
    apply_dispersion, apply_gamma, apply_refraction, ChannelSplit, DispersionParams,
    DisplacementField, EffectError, FalloffDirection, RefractionParams, Surface,
};

const INTENSITIES: [f32; 6] = [0.0, 0.01, 0.05, 0.1, 0.5, 2.0];
const FALLOFFS: [FalloffDirection; 2] = [FalloffDirection::Rising, FalloffDirection::Falling];
const SPLITS: [ChannelSplit; 2] = [ChannelSplit::Axis, ChannelSplit::Radial];

fn noise(width: u32, height: u32) -> Surface {
    Surface::from_fn(width, height, |x, y| {
        let h = (x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663)).wrapping_mul(2_654_435_761);
        [
            (h >> 24) as u8,
            (h >> 16) as u8,
            (h >> 8) as u8,
            (x * 7 + y * 13) as u8,
        ]
    })
    .expect("noise surface")
}

#[test]
fn gamma_one_is_identity() {
    for (w, h) in [(1, 1), (4, 4), (17, 9)] {
        let surface = noise(w, h);
        assert_eq!(apply_gamma(&surface, 1.0).expect("gamma"), surface);
    }
}

#[test]
fn gamma_is_monotonic_in_power() {
    for value in 1..=254_u8 {
        let v = f32::from(value) / 255.0;
        let mut previous = v.powf(0.1);
        for step in 2..=40 {
            let current = v.powf(step as f32 * 0.1);
            assert!(current < previous, "v={v} power={}", step as f32 * 0.1);
            previous = current;
        }
    }

    let low = GammaTable::new(0.5).expect("table");
    let high = GammaTable::new(2.5).expect("table");
    for value in 1..=254_u8 {
        assert!(low.map(value) >= high.map(value));
    }
}

#[test]
fn white_surface_survives_gamma_two() {
    let white = Surface::filled(4, 4, [255, 255, 255, 255]).expect("white");
    assert_eq!(apply_gamma(&white, 2.0).expect("gamma"), white);
}

#[test]
fn zero_intensity_dispersion_is_byte_identical() {
    let surface = noise(4, 4);
    for split in SPLITS {
        for falloff in FALLOFFS {
            let params = DispersionParams {
                intensity: 0.0,
                split,
                falloff,
            };
            let out = apply_dispersion(&surface, &params).expect("dispersion");
            assert_eq!(out.as_bytes(), surface.as_bytes());
        }
    }
}

#[test]
fn zero_intensity_refraction_is_byte_identical() {
    let surface = noise(9, 6);
    for depth_effect in [false, true] {
        for falloff in FALLOFFS {
            let params = RefractionParams {
                intensity: 0.0,
                depth_effect,
                falloff,
            };
            assert_eq!(apply_refraction(&surface, &params).expect("refraction"), surface);
        }
    }
}

#[test]
fn derived_coordinates_stay_in_bounds() {
    for (width, height) in [(1, 1), (2, 7), (15, 4), (33, 21)] {
        let surface = noise(width, height);
        for intensity in INTENSITIES {
            for falloff in FALLOFFS {
                for depth_effect in [false, true] {
                    let field =
                        DisplacementField::new(width, height, intensity, falloff, depth_effect)
                            .expect("field");
                    for y in 0..height {
                        for x in 0..width {
                            for split in SPLITS {
                                let coords = channel_coordinates(&surface, &field, split, x, y);
                                for (tx, ty) in [coords.red, coords.green, coords.blue] {
                                    let (cx, cy) = surface.clamp_coordinate(tx, ty);
                                    assert!(cx < width && cy < height);
                                }
                            }

                            let offset =
                                refraction_offset(&field, width, height, depth_effect, x, y);
                            let (sx, sy) = offset.apply_to(x, y);
                            let (cx, cy) = surface.clamp_coordinate(sx, sy);
                            assert!(cx < width && cy < height);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn large_intensities_never_read_out_of_bounds() {
    let surface = noise(12, 8);
    for intensity in INTENSITIES {
        for split in SPLITS {
            let params = DispersionParams {
                intensity,
                split,
                falloff: FalloffDirection::Falling,
            };
            let out = apply_dispersion(&surface, &params).expect("dispersion");
            assert_eq!((out.width(), out.height()), (12, 8));
        }
        let params = RefractionParams {
            intensity,
            depth_effect: true,
            falloff: FalloffDirection::Rising,
        };
        let out = apply_refraction(&surface, &params).expect("refraction");
        assert_eq!((out.width(), out.height()), (12, 8));
    }
}

/// Nearest edge along one axis of an 8-pixel surface, seen from the middle.
fn edge_toward(v: u32) -> u32 {
    match v {
        0..=3 => 0,
        4 => 4,
        _ => 7,
    }
}

#[test]
fn extreme_intensities_clamp_to_the_nearest_edge() {
    let surface = noise(8, 8);
    for intensity in [1.0e30, f32::MAX] {
        let refracted = apply_refraction(
            &surface,
            &RefractionParams {
                intensity,
                depth_effect: false,
                falloff: FalloffDirection::Rising,
            },
        )
        .expect("refraction");
        let axis = apply_dispersion(
            &surface,
            &DispersionParams {
                intensity,
                split: ChannelSplit::Axis,
                falloff: FalloffDirection::Rising,
            },
        )
        .expect("axis dispersion");
        let radial = apply_dispersion(
            &surface,
            &DispersionParams {
                intensity,
                split: ChannelSplit::Radial,
                falloff: FalloffDirection::Rising,
            },
        )
        .expect("radial dispersion");

        for y in 0..8 {
            for x in 0..8 {
                let source = surface.pixel(x, y);
                let edge = surface.pixel(edge_toward(x), edge_toward(y));
                assert_eq!(
                    refracted.pixel(x, y),
                    [edge[0], edge[1], edge[2], source[3]],
                    "refraction at ({x}, {y}) intensity {intensity}"
                );

                let radial_px = radial.pixel(x, y);
                assert_eq!(radial_px[0], edge[0], "radial red at ({x}, {y})");
                assert_eq!(radial_px[1], edge[1], "radial green at ({x}, {y})");
                assert_eq!(radial_px[2], source[2]);

                // The center pixel has zero falloff and stays put.
                if (x, y) == (4, 4) {
                    assert_eq!(axis.pixel(x, y), source);
                } else {
                    let axis_px = axis.pixel(x, y);
                    assert_eq!(axis_px[0], surface.pixel(7, y)[0], "axis red at ({x}, {y})");
                    assert_eq!(axis_px[1], source[1]);
                    assert_eq!(axis_px[2], surface.pixel(0, y)[2], "axis blue at ({x}, {y})");
                }
            }
        }
    }
}

#[test]
fn alpha_is_preserved_by_spatial_effects() {
    let surface = noise(23, 14);
    for intensity in [0.02, 0.1, 0.8] {
        for falloff in FALLOFFS {
            for split in SPLITS {
                let out = apply_dispersion(
                    &surface,
                    &DispersionParams {
                        intensity,
                        split,
                        falloff,
                    },
                )
                .expect("dispersion");
                for (before, after) in surface.pixels().iter().zip(out.pixels()) {
                    assert_eq!(before[3], after[3]);
                }
            }
            for depth_effect in [false, true] {
                let out = apply_refraction(
                    &surface,
                    &RefractionParams {
                        intensity,
                        depth_effect,
                        falloff,
                    },
                )
                .expect("refraction");
                for (before, after) in surface.pixels().iter().zip(out.pixels()) {
                    assert_eq!(before[3], after[3]);
                }
            }
        }
    }
}

#[test]
fn center_displacement_matches_falloff_at_zero() {
    let (width, height) = (64, 32);
    let (cx, cy) = (width / 2, height / 2);
    assert_eq!(
        NormalizedCoordinate::from_pixel(cx, cy, width, height).length(),
        0.0
    );

    let rising = DisplacementField::new(width, height, 0.07, FalloffDirection::Rising, false)
        .expect("field");
    assert_eq!(rising.at(cx, cy).magnitude, 0.0);

    let falling = DisplacementField::new(width, height, 0.07, FalloffDirection::Falling, false)
        .expect("field");
    let at_center = falling.at(cx, cy);
    assert_eq!(at_center.falloff, 1.0);
    assert!((at_center.magnitude - 0.07).abs() < 1e-7);
    for y in 0..height {
        for x in 0..width {
            assert!(falling.at(x, y).magnitude <= at_center.magnitude);
        }
    }
}

#[test]
fn degenerate_parameters_are_rejected_before_dispatch() {
    let surface = noise(4, 4);

    let err = apply_dispersion(
        &surface,
        &DispersionParams {
            intensity: -0.1,
            ..DispersionParams::default()
        },
    )
    .expect_err("negative intensity");
    assert!(matches!(err, EffectError::InvalidParameter { name: "intensity", .. }));

    let err = apply_refraction(
        &surface,
        &RefractionParams {
            intensity: f32::NAN,
            ..RefractionParams::default()
        },
    )
    .expect_err("nan intensity");
    assert!(err.is_invalid_parameter());

    for power in [0.0, -2.0, f32::INFINITY] {
        assert!(apply_gamma(&surface, power).is_err());
    }

    assert!(matches!(
        Surface::from_rgba(0, 3, Vec::new()),
        Err(EffectError::InvalidDimensions { .. })
    ));
}

#[test]
fn parallel_dispatch_is_deterministic() {
    let surface = noise(257, 129);
    let params = DispersionParams {
        intensity: 0.06,
        split: ChannelSplit::Radial,
        falloff: FalloffDirection::Rising,
    };
    let first = apply_dispersion(&surface, &params).expect("first");
    let second = apply_dispersion(&surface, &params).expect("second");
    assert_eq!(first.sha256_hex(), second.sha256_hex());
}
