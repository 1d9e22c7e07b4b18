//! lapmap application: rasterize a tile map, overlay its lap-position table,
//! and save the result as a PNG.

pub mod platform;

use std::path::{Path, PathBuf};

use lapmap_config::{CliArgs, Config, ConfigError};
use lapmap_field::{FieldLoadError, LapPositionTable, NavigationField, read_table_file};
use lapmap_image::{ImageWriteError, PixelBuffer, write_png};
use lapmap_map::{MapLoadError, TileMap, load_map};
use lapmap_overlay::{Compositor, ConsoleProgress, FieldLookupError, ProgressObserver};
use lapmap_render::{MapRenderError, output_size, rasterize_map};

use crate::platform::PlatformDirs;

/// Anything that stops a diagnostic image from being produced.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load map: {0}")]
    Map(#[from] MapLoadError),

    #[error("failed to load lap-position table: {0}")]
    Field(#[from] FieldLoadError),

    #[error("failed to rasterize map: {0}")]
    Render(#[from] MapRenderError),

    #[error("failed to overlay lap positions: {0}")]
    Overlay(#[from] FieldLookupError),

    #[error("failed to write image: {0}")]
    Write(#[from] ImageWriteError),
}

/// Rasterize `map` and blend `field` over it.
///
/// The field must match the map's pixel size; this is checked before any
/// rendering starts. Rasterizer resources are released before compositing.
pub fn generate_diagnostic<F, P>(
    map: &TileMap,
    field: &F,
    config: &Config,
    progress: &mut P,
) -> Result<PixelBuffer, AppError>
where
    F: NavigationField + ?Sized,
    P: ProgressObserver + ?Sized,
{
    let (width, height) = output_size(map)?;
    if field.width() != width || field.height() != height {
        return Err(FieldLookupError::DimensionMismatch {
            field_width: field.width(),
            field_height: field.height(),
            buffer_width: width,
            buffer_height: height,
        }
        .into());
    }

    log::info!("Drawing map ({width}x{height}, {:?})", config.render.backend);
    let mut image = rasterize_map(map, &config.render)?;

    log::info!("Drawing table");
    let stats = Compositor::from_config(&config.overlay).composite(&mut image, field, progress)?;
    log::info!(
        "Overlaid {} lap positions ({} pixels untouched)",
        stats.blended,
        stats.untouched
    );

    Ok(image)
}

/// Load config, set up logging, then produce and save the diagnostic image.
///
/// Returns the path the PNG was written to.
pub fn run(args: &CliArgs) -> Result<PathBuf, AppError> {
    let (config, dirs) = match load_config(args) {
        Ok(loaded) => loaded,
        Err(e) => {
            lapmap_log::init_logging(None, None);
            return Err(e);
        }
    };
    lapmap_log::init_logging(Some(&dirs.log_dir), Some(&config));

    let map = load_map(&args.map)?;
    let field = load_field_for(&map, &args.field)?;
    let image = generate_diagnostic(&map, &field, &config, &mut ConsoleProgress::stdout())?;

    let output = args.output_path();
    log::info!("Saving PNG to {}", output.display());
    write_png(&output, &image)?;
    Ok(output)
}

/// Load the lap table at `path`, refusing to build it unless its declared size
/// matches the map's.
fn load_field_for(map: &TileMap, path: &Path) -> Result<LapPositionTable, AppError> {
    let (width, height) = output_size(map)?;
    let file = read_table_file(path)?;
    if (file.width, file.height) != (width, height) {
        return Err(FieldLookupError::DimensionMismatch {
            field_width: file.width,
            field_height: file.height,
            buffer_width: width,
            buffer_height: height,
        }
        .into());
    }
    let table = file.into_table()?;
    log::info!(
        "Loaded lap table {} ({} samples)",
        path.display(),
        table.sample_count()
    );
    Ok(table)
}

fn load_config(args: &CliArgs) -> Result<(Config, PlatformDirs), AppError> {
    let dirs = PlatformDirs::resolve(args.config.as_deref())?;
    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    Ok((config, dirs))
}
