use rid_config::ClearanceTable;
use rid_core::AirportRecord;
use rid_geo::Coordinate;

/// First airport closer to `origin` than its category's clearance.
pub fn airport_within_clearance(
    origin: Coordinate,
    airports: &[AirportRecord],
    clearances: &ClearanceTable,
) -> Option<AirportRecord> {
    airports
        .iter()
        .find(|airport| {
            origin.distance_km(airport.position) < clearances.for_airport(airport.category)
        })
        .copied()
}

/// First prison closer to `origin` than `clearance_km`.
pub fn prison_within_clearance(
    origin: Coordinate,
    prisons: &[Coordinate],
    clearance_km: f64,
) -> Option<Coordinate> {
    prisons
        .iter()
        .find(|prison| origin.distance_km(**prison) < clearance_km)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rid_core::AirportCategory;

    const ORIGIN: Coordinate = Coordinate::new(45.0, 7.0);

    /// One hundredth of a degree of latitude is about 1.11 km.
    fn north_of_origin(hundredths: f64) -> Coordinate {
        Coordinate::new(ORIGIN.latitude + hundredths / 100.0, ORIGIN.longitude)
    }

    #[test]
    fn clearance_depends_on_category() {
        let position = north_of_origin(4.0); // ~4.4 km
        let clearances = ClearanceTable::default();

        let large = [AirportRecord { category: AirportCategory::LargeAirport, position }];
        let small = [AirportRecord { category: AirportCategory::SmallAirport, position }];

        assert!(airport_within_clearance(ORIGIN, &large, &clearances).is_some());
        assert!(airport_within_clearance(ORIGIN, &small, &clearances).is_none());
    }

    #[test]
    fn override_replaces_every_category() {
        let position = north_of_origin(4.0);
        let airports = [AirportRecord { category: AirportCategory::Heliport, position }];
        let clearances = ClearanceTable {
            airport_override_km: Some(10.0),
            ..ClearanceTable::default()
        };

        let hit = airport_within_clearance(ORIGIN, &airports, &clearances);
        assert_eq!(hit.map(|airport| airport.category), Some(AirportCategory::Heliport));
    }

    #[test]
    fn no_airports_means_no_hit() {
        assert!(airport_within_clearance(ORIGIN, &[], &ClearanceTable::default()).is_none());
    }

    #[test]
    fn prison_clearance_is_exclusive() {
        let prisons = [north_of_origin(0.5), north_of_origin(50.0)];
        assert_eq!(prison_within_clearance(ORIGIN, &prisons, 1.0), Some(prisons[0]));

        let exact = ORIGIN.distance_km(prisons[1]);
        assert!(prison_within_clearance(ORIGIN, &prisons[1..], exact).is_none());
    }
}
