//! End-to-end runs of the diagnostic pipeline with the software rasterizer.

use std::path::Path;

use image::{Rgba, RgbaImage};
use lapmap_app::{AppError, generate_diagnostic, run};
use lapmap_config::{BackendArg, CliArgs, Config, RasterBackend};
use lapmap_field::{LapPosition, LapPositionTable, save_table};
use lapmap_map::load_map;
use lapmap_overlay::{FieldLookupError, NoProgress};

const TILE_COLOR: [u8; 3] = [100, 50, 200];

/// A 2x2 grid of 10x10 tiles, all the same solid color.
fn write_track(dir: &Path) -> std::path::PathBuf {
    let [r, g, b] = TILE_COLOR;
    RgbaImage::from_pixel(10, 10, Rgba([r, g, b, 255]))
        .save(dir.join("tiles.png"))
        .unwrap();

    let map_path = dir.join("track.ron");
    std::fs::write(
        &map_path,
        r#"(
            tile_width: 10,
            tile_height: 10,
            tilesets: [(name: "ground", first_gid: 1, image: "tiles.png", columns: 1, tile_count: 1)],
            layers: [(name: "road", width: 2, height: 2, tiles: [1, 1, 1, 1])],
        )"#,
    )
    .unwrap();
    map_path
}

/// Bottom row on the centerline, halfway through section 0 of 1.
fn bottom_row_table() -> LapPositionTable {
    let mut table = LapPositionTable::new(20, 20, 1);
    for x in 0..20 {
        table.set(x, 19, LapPosition::new(0, 0.5, 0.0));
    }
    table
}

fn decode_png(path: &Path) -> (u32, u32, Vec<u8>) {
    let decoder = png::Decoder::new(std::fs::File::open(path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

#[test]
fn test_bottom_row_blended_rest_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let map = load_map(&write_track(dir.path())).unwrap();
    let mut config = Config::default();
    config.render.backend = RasterBackend::Software;

    let image = generate_diagnostic(&map, &bottom_row_table(), &config, &mut NoProgress).unwrap();

    assert_eq!((image.width(), image.height()), (20, 20));
    for y in 0..19 {
        for x in 0..20 {
            assert_eq!(image.pixel_top_down(x, y), TILE_COLOR, "pixel ({x}, {y})");
        }
    }
    // 70% of the way toward (255, 0, 128), truncated.
    for x in 0..20 {
        assert_eq!(image.pixel_top_down(x, 19), [208, 15, 149]);
    }
}

#[test]
fn test_run_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let map_path = write_track(dir.path());
    let field_path = dir.path().join("track.lap.ron");
    save_table(&field_path, &bottom_row_table()).unwrap();

    let args = CliArgs {
        map: map_path,
        field: field_path,
        output: None,
        backend: Some(BackendArg::Software),
        opacity: None,
        clamp: false,
        log_level: Some("warn".to_string()),
        config: Some(dir.path().join("config")),
    };

    let output = run(&args).unwrap();

    assert_eq!(output, dir.path().join("track.png"));
    assert!(dir.path().join("config").join("config.ron").exists());
    let (width, height, rgba) = decode_png(&output);
    assert_eq!((width, height), (20, 20));
    // PNG rows are top-down.
    assert_eq!(&rgba[..4], &[100, 50, 200, 255]);
    let last_row = (19 * 20 * 4) as usize;
    assert_eq!(&rgba[last_row..last_row + 4], &[208, 15, 149, 255]);
}

#[test]
fn test_run_reports_missing_field() {
    let dir = tempfile::tempdir().unwrap();
    let args = CliArgs {
        map: write_track(dir.path()),
        field: dir.path().join("missing.lap.ron"),
        output: Some(dir.path().join("out.png")),
        backend: Some(BackendArg::Software),
        opacity: None,
        clamp: false,
        log_level: None,
        config: Some(dir.path().join("config")),
    };

    let result = run(&args);

    assert!(matches!(result, Err(AppError::Field(_))));
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn test_run_rejects_oversized_table_header() {
    let dir = tempfile::tempdir().unwrap();
    let field_path = dir.path().join("huge.lap.ron");
    std::fs::write(
        &field_path,
        "(width: 4294967295, height: 4294967295, section_count: 1)",
    )
    .unwrap();
    let args = CliArgs {
        map: write_track(dir.path()),
        field: field_path,
        output: Some(dir.path().join("out.png")),
        backend: Some(BackendArg::Software),
        opacity: None,
        clamp: false,
        log_level: None,
        config: Some(dir.path().join("config")),
    };

    let result = run(&args);

    assert!(matches!(
        result,
        Err(AppError::Overlay(FieldLookupError::DimensionMismatch {
            field_width: u32::MAX,
            buffer_width: 20,
            ..
        }))
    ));
    assert!(!dir.path().join("out.png").exists());
}
