use rid_core::{AirportCategory, AirportRecord, Coordinate};

/// One line of the country borders table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderRecord {
    /// `#...` starts a new polygon; anything after the `#` is ignored.
    Delimiter,
    Vertex(Coordinate),
}

/// Parses a border line. Blank lines yield `None`.
pub fn parse_border(line: &str) -> Option<BorderRecord> {
    let line = line.trim();
    if line.is_empty() {
        None
    } else if line.starts_with('#') {
        Some(BorderRecord::Delimiter)
    } else {
        Some(BorderRecord::Vertex(parse_coordinate(line)))
    }
}

/// Parses `<lat>,<lon>`. Lines without a comma become [`Coordinate::ZERO`] and unreadable
/// numbers become `0.0`.
pub fn parse_coordinate(line: &str) -> Coordinate {
    let Some((lat, lon)) = line.trim().split_once(',') else {
        tracing::debug!(line, "malformed coordinate record");
        return Coordinate::ZERO;
    };
    Coordinate::new(parse_degrees(lat), parse_degrees(lon))
}

/// Parses `<categoryIndex>,<lat>,<lon>`. Malformed lines, including unknown category indices,
/// become a zero record.
pub fn parse_airport(line: &str) -> AirportRecord {
    let mut parts = line.trim().splitn(3, ',');
    let (Some(category), Some(lat), Some(lon)) = (parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!(line, "malformed airport record");
        return AirportRecord::default();
    };
    match category.parse::<AirportCategory>() {
        Ok(category) => AirportRecord::new(category, parse_degrees(lat), parse_degrees(lon)),
        Err(()) => {
            tracing::debug!(line, "unknown airport category");
            AirportRecord::default()
        }
    }
}

fn parse_degrees(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_lines() {
        assert_eq!(parse_border("# Andorra"), Some(BorderRecord::Delimiter));
        assert_eq!(parse_border("#"), Some(BorderRecord::Delimiter));
        assert_eq!(parse_border("   "), None);
        assert_eq!(
            parse_border("42.5,1.5\r"),
            Some(BorderRecord::Vertex(Coordinate::new(42.5, 1.5)))
        );
    }

    #[test]
    fn coordinate_without_comma_is_zero() {
        assert!(parse_coordinate("42.5 1.5").is_zero());
        assert!(parse_coordinate("").is_zero());
    }

    #[test]
    fn unreadable_component_is_zero() {
        let coord = parse_coordinate("abc,1.25");
        assert_eq!(coord, Coordinate::new(0.0, 1.25));
    }

    #[test]
    fn airport_lines() {
        let record = parse_airport("3,40.4719,-3.5626");
        assert_eq!(record.category, AirportCategory::Heliport);
        assert_eq!(record.position, Coordinate::new(40.4719, -3.5626));

        let record = parse_airport("0, 51.47 , -0.4543");
        assert_eq!(record.category, AirportCategory::LargeAirport);
        assert_eq!(record.position, Coordinate::new(51.47, -0.4543));
    }

    #[test]
    fn malformed_airport_lines_are_zero_records() {
        for line in ["40.1,-3.2", "9,40.1,-3.2", "x,40.1,-3.2", ""] {
            let record = parse_airport(line);
            assert!(record.position.is_zero(), "{line}");
            assert_eq!(record.category, AirportCategory::LargeAirport);
        }
    }
}
