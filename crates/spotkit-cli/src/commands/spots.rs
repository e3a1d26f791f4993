use std::path::Path;
use std::sync::Arc;

use spotkit_core::config::SpotkitConfig;
use spotkit_core::{ImageSpot, PipeSize, RepairSpot, Spot, SpotPoint, TuningSpot};

use super::SpotFile;

/// Geometry for `spotkit add`. Lengths and position are in the scale of
/// `pipe_size`; unset values come from the config defaults.
#[derive(Debug, Clone, Default)]
pub struct AddSpotArgs {
    pub x: u32,
    pub y: u32,
    pub radius_w: Option<u32>,
    pub radius_h: Option<u32>,
    pub angle: Option<f32>,
    pub edge_radius: Option<u32>,
    pub edge_blur: Option<f32>,
    pub opacity: Option<f32>,
    pub pipe_size: Option<PipeSize>,
    pub tuning: bool,
    pub repair_from: Option<SpotPoint>,
    pub disabled: bool,
}

/// One-line summary of a spot at its current pipe size.
pub fn describe_spot(index: usize, spot: &dyn Spot) -> String {
    let base = spot.base();
    let pos = base.pos();
    let mut line = format!(
        "[{}] {:<6} {} pos=({}, {}) radius={}x{} angle={:.1} edge={} blur={:.2} opacity={:.2}",
        index,
        spot.kind(),
        if base.is_enabled() { "on " } else { "off" },
        pos.x,
        pos.y,
        base.radius_w(),
        base.radius_h(),
        base.angle(),
        base.edge_radius(),
        base.edge_blur(),
        base.opacity(),
    );

    if let Some(tuning) = spot.as_tuning() {
        line.push_str(&format!(
            " saturation={} adaptive={} chroma={:.2}",
            tuning.saturation(),
            tuning.is_adaptive_sat(),
            tuning.chroma_weight()
        ));
        if tuning.has_max_radius() {
            line.push_str(&format!(" max_radius={}", tuning.scaled_max_radius()));
        }
        if !tuning.curve().is_identity() {
            line.push_str(&format!(" curve={} anchors", tuning.curve().anchors().len()));
        }
    }
    line
}

/// Print all spots stored in `file`.
pub fn cmd_list(
    file: &Path,
    pipe_size: Option<PipeSize>,
    prefix: Option<&str>,
    config: &SpotkitConfig,
) -> Result<(), String> {
    let mut spots = SpotFile::open(file, prefix, config)?;
    let pipe_size = pipe_size.unwrap_or_else(|| config.defaults.pipe_size());
    spots.list.set_pipe_size(pipe_size);

    println!(
        "{}: {} spot(s) in '{}' at pipe size {}",
        file.display(),
        spots.list.len(),
        spots.list.name(),
        pipe_size.label()
    );
    for (index, spot) in spots.list.iter().enumerate() {
        println!("  {}", describe_spot(index, spot));
    }
    Ok(())
}

/// Build the spot described by `args`, using the setters so that the given
/// values are interpreted at `args.pipe_size`.
pub(crate) fn build_spot(
    args: &AddSpotArgs,
    config: &SpotkitConfig,
    catalog: &Arc<spotkit_core::ConfigCatalog>,
) -> Box<dyn Spot> {
    let pipe_size = args.pipe_size.unwrap_or_else(|| config.defaults.pipe_size());

    // Defaults are full-resolution values and go in unscaled; only explicit
    // arguments pass through the setters.
    let mut image = ImageSpot::with_geometry(!args.disabled, config.defaults.geometry_at(0, 0));
    image.set_pipe_size(pipe_size);
    if let Some(radius_w) = args.radius_w {
        image.set_radius_w(radius_w);
    }
    if let Some(radius_h) = args.radius_h.or(args.radius_w) {
        image.set_radius_h(radius_h);
    }
    if let Some(angle) = args.angle {
        image.set_angle(angle);
    }
    if let Some(edge_radius) = args.edge_radius {
        image.set_edge_radius(edge_radius);
    }
    if let Some(blur) = args.edge_blur {
        image.set_edge_blur(blur);
    }
    if let Some(opacity) = args.opacity {
        image.set_opacity(opacity);
    }
    image.move_center(args.x, args.y);

    let mut spot: Box<dyn Spot> = if args.tuning {
        Box::new(TuningSpot::new(image, Arc::clone(catalog)))
    } else if let Some(source) = args.repair_from {
        let mut repair = RepairSpot::new(image, SpotPoint::default());
        repair.set_repairer(source.x, source.y);
        Box::new(repair)
    } else {
        Box::new(image)
    };
    // Hand the spot over at full resolution.
    spot.set_pipe_size(PipeSize::FULL);
    spot
}

/// Append a spot to the list stored in `file`.
pub fn cmd_add(
    file: &Path,
    args: &AddSpotArgs,
    prefix: Option<&str>,
    config: &SpotkitConfig,
) -> Result<(), String> {
    let mut spots = SpotFile::open(file, prefix, config)?;
    let spot = build_spot(args, config, &spots.catalog);
    let summary = describe_spot(spots.list.len(), spot.as_ref());

    spots.list.push(spot);
    spots.save()?;

    println!("Added {}", summary);
    Ok(())
}

/// Remove the spot at `index`.
pub fn cmd_remove(
    file: &Path,
    index: usize,
    prefix: Option<&str>,
    config: &SpotkitConfig,
) -> Result<(), String> {
    let mut spots = SpotFile::open(file, prefix, config)?;
    spots.check_index(index)?;

    spots.list.remove_at(index);
    spots.save()?;

    println!("Removed spot {} ({} left)", index, spots.list.len());
    Ok(())
}

/// Remove every spot of the list.
pub fn cmd_clear(file: &Path, prefix: Option<&str>, config: &SpotkitConfig) -> Result<(), String> {
    let mut spots = SpotFile::open(file, prefix, config)?;
    let count = spots.list.len();

    spots.list.clear();
    spots.save()?;

    println!("Removed {} spot(s) from '{}'", count, spots.list.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotkit_core::{IniSettings, SpotKind};

    fn config() -> SpotkitConfig {
        let mut config = SpotkitConfig::default();
        config.defaults.radius = 40;
        config.defaults.edge_radius = 10;
        config
    }

    #[test]
    fn test_add_list_remove_clear() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("spots.yml");
        let config = config();

        cmd_add(&file, &AddSpotArgs { x: 10, y: 20, ..Default::default() }, None, &config).unwrap();
        cmd_add(
            &file,
            &AddSpotArgs {
                x: 30,
                y: 40,
                tuning: true,
                ..Default::default()
            },
            None,
            &config,
        )
        .unwrap();
        cmd_list(&file, None, None, &config).unwrap();

        let spots = SpotFile::open(&file, None, &config).unwrap();
        assert_eq!(spots.list.len(), 2);
        assert_eq!(spots.list.get(1).map(|s| s.kind()), Some(SpotKind::Tuning));

        cmd_remove(&file, 0, None, &config).unwrap();
        assert!(cmd_remove(&file, 5, None, &config).is_err());
        let spots = SpotFile::open(&file, None, &config).unwrap();
        assert_eq!(spots.list.len(), 1);
        assert_eq!(spots.list.get(0).map(|s| s.base().pos()), Some(SpotPoint::new(30, 40)));

        cmd_clear(&file, None, &config).unwrap();
        let ini = IniSettings::load(&file).unwrap();
        assert_eq!(ini.value("LocalSpot/size").and_then(|v| v.as_i64()), Some(0));
    }

    #[test]
    fn test_build_spot_scales_arguments_to_full_resolution() {
        let config = config();
        let catalog = Arc::new(config.tuning_catalog());
        let args = AddSpotArgs {
            x: 50,
            y: 60,
            radius_w: Some(8),
            radius_h: Some(4),
            edge_radius: Some(2),
            pipe_size: Some(PipeSize::new(2)),
            ..Default::default()
        };

        let spot = build_spot(&args, &config, &catalog);
        let geometry = spot.base().geometry();

        assert_eq!(spot.base().pipe_size(), PipeSize::FULL);
        assert_eq!((geometry.x, geometry.y), (200, 240));
        assert_eq!((geometry.radius_w, geometry.radius_h), (32, 16));
        assert_eq!(geometry.edge_radius, 8);
    }

    #[test]
    fn test_build_spot_uses_config_defaults() {
        let config = config();
        let catalog = Arc::new(config.tuning_catalog());
        let spot = build_spot(&AddSpotArgs::default(), &config, &catalog);
        let geometry = spot.base().geometry();

        assert_eq!((geometry.radius_w, geometry.radius_h), (40, 40));
        assert_eq!(geometry.edge_radius, 10);
        assert!(spot.base().is_enabled());
    }

    #[test]
    fn test_build_spot_keeps_defaults_exact_at_reduced_pipe_size() {
        let mut config = config();
        config.defaults.radius = 25;
        config.defaults.edge_radius = 7;
        let catalog = Arc::new(config.tuning_catalog());
        let args = AddSpotArgs {
            x: 10,
            y: 10,
            radius_h: Some(3),
            pipe_size: Some(PipeSize::new(2)),
            ..Default::default()
        };

        let geometry = build_spot(&args, &config, &catalog).base().geometry();

        assert_eq!(geometry.radius_w, 25);
        assert_eq!(geometry.edge_radius, 7);
        assert_eq!(geometry.radius_h, 12);
    }

    #[test]
    fn test_build_repair_spot() {
        let config = config();
        let catalog = Arc::new(config.tuning_catalog());
        let args = AddSpotArgs {
            x: 5,
            y: 5,
            repair_from: Some(SpotPoint::new(70, 80)),
            ..Default::default()
        };
        let spot = build_spot(&args, &config, &catalog);
        assert_eq!(spot.kind(), SpotKind::Repair);
    }

    #[test]
    fn test_describe_spot_mentions_tuning_values() {
        let config = config();
        let catalog = Arc::new(config.tuning_catalog());
        let spot = build_spot(
            &AddSpotArgs {
                tuning: true,
                ..Default::default()
            },
            &config,
            &catalog,
        );
        let line = describe_spot(3, spot.as_ref());
        assert!(line.starts_with("[3] tuning"));
        assert!(line.contains("saturation=0"));
    }
}
