//! Minimal TOML reader for device configuration
//!
//! Handles only the subset the device file uses; it is not a general TOML
//! parser.
//!
//! Supported:
//! - `[joystick]`, `[zoom]`, `[screen]`, `[route]`, `[serial]` tables
//! - `[[map]]` array-of-tables entries, one per zoom level
//! - `key = integer` pairs, with an optional trailing comment
//! - Comment lines (`# ...`)
//!
//! Keys a section does not know are rejected so typos surface at boot
//! instead of silently keeping the default. The first `[[map]]` entry
//! replaces the built-in map levels.

use core::str::FromStr;

use super::types::{MapBox, NavConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value is not an integer or does not fit the field
    InvalidValue,
    /// Key not known in the current section
    UnknownKey,
    /// More `[[map]]` entries than supported zoom levels
    TooManyItems,
    /// Values parse but contradict each other
    Inconsistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Joystick,
    Zoom,
    Screen,
    Route,
    Serial,
    Map,
}

/// Parse device TOML into a [`NavConfig`]
///
/// Sections and keys that are absent keep their defaults. The result is
/// validated before it is returned.
pub fn parse_config(input: &str) -> Result<NavConfig, ParseError> {
    let mut config = NavConfig::default();
    let mut section = Section::Root;
    let mut maps_replaced = false;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix("[[").and_then(|l| l.strip_suffix("]]")) {
            if header.trim() != "map" {
                return Err(ParseError::InvalidSection);
            }
            if !maps_replaced {
                config.maps.clear();
                maps_replaced = true;
            }
            config
                .maps
                .push(MapBox::default())
                .map_err(|_| ParseError::TooManyItems)?;
            section = Section::Map;
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(&mut config, section, key, value)?;
    }

    config.validate()?;
    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "joystick" => Ok(Section::Joystick),
        "zoom" => Ok(Section::Zoom),
        "screen" => Ok(Section::Screen),
        "route" => Ok(Section::Route),
        "serial" => Ok(Section::Serial),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse an integer value, accepting `_` digit separators
fn parse_int<T: FromStr>(value: &str) -> Result<T, ParseError> {
    if !value.contains('_') {
        return value.parse().map_err(|_| ParseError::InvalidValue);
    }
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn apply_value(
    config: &mut NavConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::UnknownKey),
        Section::Joystick => {
            let j = &mut config.joystick;
            match key {
                "dead_zone" => j.dead_zone = parse_int(value)?,
                "divisor" => j.divisor = parse_int(value)?,
                "button_sample_ms" => j.button_sample_ms = parse_int(value)?,
                "calibration_samples" => j.calibration_samples = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Zoom => {
            let z = &mut config.zoom;
            match key {
                "debounce_ms" => z.debounce_ms = parse_int(value)?,
                "initial_level" => z.initial_level = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Screen => {
            let s = &mut config.screen;
            match key {
                "width" => s.width = parse_int(value)?,
                "map_height" => s.map_height = parse_int(value)?,
                "status_height" => s.status_height = parse_int(value)?,
                "left_margin" => s.left_margin = parse_int(value)?,
                "right_margin" => s.right_margin = parse_int(value)?,
                "top_margin" => s.top_margin = parse_int(value)?,
                "bottom_margin" => s.bottom_margin = parse_int(value)?,
                "scroll_step" => s.scroll_step = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Route => {
            let r = &mut config.route;
            match key {
                "timeout_ms" => r.timeout_ms = parse_int(value)?,
                "max_points" => r.max_points = parse_int(value)?,
                "status_hold_ms" => r.status_hold_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Serial => match key {
            "baudrate" => config.serial.baudrate = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Map => {
            let map = config.maps.last_mut().ok_or(ParseError::InvalidSection)?;
            match key {
                "north" => map.north = parse_int(value)?,
                "south" => map.south = parse_int(value)?,
                "west" => map.west = parse_int(value)?,
                "east" => map.east = parse_int(value)?,
                "width" => map.width = parse_int(value)?,
                "height" => map.height = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(NavConfig::default()));
    }

    #[test]
    fn test_parse_sections() {
        let input = r#"
# Bench unit
[joystick]
dead_zone = 6
divisor = 64   # faster cursor

[zoom]
debounce_ms = 300

[route]
timeout_ms = 8_000

[serial]
baudrate = 115200
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.joystick.dead_zone, 6);
        assert_eq!(config.joystick.divisor, 64);
        assert_eq!(config.joystick.button_sample_ms, 200);
        assert_eq!(config.zoom.debounce_ms, 300);
        assert_eq!(config.route.timeout_ms, 8000);
        assert_eq!(config.serial.baudrate, 115200);
    }

    #[test]
    fn test_map_entries_replace_defaults() {
        let input = r#"
[[map]]
north = 100
south = 0
west = -50
east = 50
width = 256
height = 256

[[map]]
north = 100
south = 0
west = -50
east = 50
width = 512
height = 512
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.maps.len(), 2);
        assert_eq!(config.maps[0].width, 256);
        assert_eq!(config.maps[1].west, -50);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let input = "[joystick]\ndeadzone = 4\n";
        assert_eq!(parse_config(input), Err(ParseError::UnknownKey));
    }

    #[test]
    fn test_key_outside_section_rejected() {
        assert_eq!(parse_config("dead_zone = 4"), Err(ParseError::UnknownKey));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert_eq!(parse_config("[motor]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[[tile]]"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_bad_value_rejected() {
        assert_eq!(
            parse_config("[zoom]\ndebounce_ms = soon\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[zoom]\ninitial_level = 300\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[zoom]\ndebounce_ms\n"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_too_many_maps() {
        let mut input = std::string::String::new();
        for _ in 0..9 {
            input.push_str("[[map]]\nnorth = 1\nsouth = 0\nwest = 0\neast = 1\nwidth = 8\nheight = 8\n");
        }
        assert_eq!(parse_config(&input), Err(ParseError::TooManyItems));
    }

    #[test]
    fn test_incomplete_map_fails_validation() {
        let input = "[[map]]\nnorth = 10\n";
        assert_eq!(parse_config(input), Err(ParseError::Inconsistent));
    }

    proptest! {
        #[test]
        fn prop_dead_zone_round_trips(value in 0u16..=u16::MAX) {
            let input = std::format!("[joystick]\ndead_zone = {}\n", value);
            let config = parse_config(&input).unwrap();
            prop_assert_eq!(config.joystick.dead_zone, value);
        }

        #[test]
        fn prop_never_panics(input in "\\PC{0,64}") {
            let _ = parse_config(&input);
        }
    }
}
