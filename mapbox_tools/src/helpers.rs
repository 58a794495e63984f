use freight_common::Coordinate;

/// The geocoding path for an address. The address is percent-encoded as a single path segment.
pub fn geocoding_path(address: &str) -> String {
    format!("/geocoding/v5/mapbox.places/{}.json", urlencoding::encode(address.trim()))
}

pub fn directions_path(start: Coordinate, end: Coordinate) -> String {
    format!("/directions/v5/mapbox/driving/{start};{end}")
}

pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / 60.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn addresses_are_encoded() {
        assert_eq!(geocoding_path("Berlin"), "/geocoding/v5/mapbox.places/Berlin.json");
        assert_eq!(
            geocoding_path(" Brīvības iela 1/3, Rīga "),
            "/geocoding/v5/mapbox.places/Br%C4%ABv%C4%ABbas%20iela%201%2F3%2C%20R%C4%ABga.json"
        );
    }

    #[test]
    fn directions_use_lon_lat_order() {
        let start = Coordinate::new(24.1, 56.9);
        let end = Coordinate::new(25.3, 54.7);
        assert_eq!(directions_path(start, end), "/directions/v5/mapbox/driving/24.1,56.9;25.3,54.7");
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(meters_to_km(123_400.0), 123.4);
        assert_eq!(seconds_to_minutes(5400.0), 90.0);
    }
}
