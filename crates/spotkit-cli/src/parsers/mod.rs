//! Argument parsing helpers shared by the CLI commands.

use spotkit_core::{PipeSize, SpotPoint};

/// Parse a pipe size given as a level ("2") or a ratio ("1:4").
pub fn parse_pipe_size(s: &str) -> Result<PipeSize, String> {
    PipeSize::parse(s)
}

/// Parse a point in format "x,y"
pub fn parse_point(s: &str) -> Result<SpotPoint, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("Point must be in format x,y, got: {}", s));
    }

    let x = parts[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid x coordinate: {}", parts[0]))?;
    let y = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid y coordinate: {}", parts[1]))?;

    Ok(SpotPoint::new(x, y))
}

/// Parse an image size in format "WIDTHxHEIGHT"
pub fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Size must be in format WxH, got: {}", s))?;

    let width = w
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid width: {}", w))?;
    let height = h
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid height: {}", h))?;

    if width == 0 || height == 0 {
        return Err(format!("Size must be non-zero, got: {}", s));
    }
    Ok((width, height))
}

/// Parse a unit-range value such as opacity or edge blur.
pub fn parse_unit(s: &str) -> Result<f32, String> {
    let value = s
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("Invalid number: {}", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("Value {} must be in range [0.0, 1.0]", value));
    }
    Ok(value)
}
