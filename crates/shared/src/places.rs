#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

const fn place(name: &'static str, latitude: f64, longitude: f64) -> Place {
    Place {
        name,
        latitude,
        longitude,
    }
}

/// Reference labels drawn over the data layer, in draw order.
pub const KNOWN_PLACES: [Place; 10] = [
    place("Los Angeles", 34.0522, -118.2437),
    place("San Francisco", 37.7749, -122.4194),
    place("San Diego", 32.7157, -117.1611),
    place("San Jose", 37.3382, -121.8863),
    place("Sacramento", 38.5816, -121.4944),
    place("Fresno", 36.7378, -119.7871),
    place("Bakersfield", 35.3733, -119.0187),
    place("Riverside", 33.9806, -117.3755),
    place("Long Beach", 33.7701, -118.1937),
    place("Oakland", 37.8044, -122.2712),
];
