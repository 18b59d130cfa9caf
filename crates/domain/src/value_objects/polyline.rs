//! Encoded Polyline Algorithm Format codec
//!
//! The wire format carries coordinates at 1e5 precision; decoded points are
//! rescaled to the 1e6 fixed point used everywhere else.

use super::point::Point;

const ASCII_OFFSET: u8 = 63;
const CONTINUATION_BIT: u32 = 0x20;
const CHUNK_MASK: u32 = 0x1f;
const FORMAT_TO_FIXED_POINT: i64 = 10;

/// Decode a polyline string into points
///
/// Decoding stops at the last complete coordinate pair: truncated or
/// out-of-alphabet trailing bytes are ignored, never reported.
#[must_use]
pub fn decode(encoded: &str) -> Vec<Point> {
    let mut bytes = encoded.bytes();
    let mut points = Vec::new();
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    loop {
        let Some(delta_lat) = next_value(&mut bytes) else {
            break;
        };
        let Some(delta_lon) = next_value(&mut bytes) else {
            break;
        };
        lat += delta_lat;
        lon += delta_lon;

        let (Ok(lat_e6), Ok(lon_e6)) = (
            i32::try_from(lat * FORMAT_TO_FIXED_POINT),
            i32::try_from(lon * FORMAT_TO_FIXED_POINT),
        ) else {
            break;
        };
        points.push(Point::from_e6(lat_e6, lon_e6));
    }

    points
}

/// Encode points into a polyline string
///
/// Coordinates are rounded to the format's 1e5 precision.
#[must_use]
pub fn encode(points: &[Point]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for point in points {
        let lat = to_format_precision(point.lat_e6());
        let lon = to_format_precision(point.lon_e6());
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

/// Read one zig-zag encoded signed value, `None` on truncated or invalid input
fn next_value(bytes: &mut impl Iterator<Item = u8>) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift = 0u32;

    loop {
        let byte = bytes.next()?;
        let chunk = u32::from(byte.checked_sub(ASCII_OFFSET)?);
        if chunk > 0x3f || shift > 30 {
            return None;
        }
        result |= i64::from(chunk & CHUNK_MASK) << shift;
        shift += 5;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    Some(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // chunks are < 64
fn push_value(out: &mut String, value: i64) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= i64::from(CONTINUATION_BIT) {
        push_chunk(out, (i64::from(CONTINUATION_BIT) | (v & i64::from(CHUNK_MASK))) as u8);
        v >>= 5;
    }
    push_chunk(out, v as u8);
}

fn push_chunk(out: &mut String, chunk: u8) {
    out.push(char::from(chunk + ASCII_OFFSET));
}

fn to_format_precision(e6: i32) -> i64 {
    // round half away from zero
    let value = i64::from(e6);
    if value >= 0 {
        (value + 5) / FORMAT_TO_FIXED_POINT
    } else {
        (value - 5) / FORMAT_TO_FIXED_POINT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOGLE_REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decodes_reference_polyline() {
        let points = decode(GOOGLE_REFERENCE);
        assert_eq!(
            points,
            vec![
                Point::from_e6(38_500_000, -120_200_000),
                Point::from_e6(40_700_000, -120_950_000),
                Point::from_e6(43_252_000, -126_453_000),
            ]
        );
    }

    #[test]
    fn decodes_first_vienna_point() {
        let points = decode("}qfeHyn|bB");
        assert_eq!(points, vec![Point::from_e6(48_207_830, 16_371_170)]);
    }

    #[test]
    fn empty_string_yields_no_points() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn truncated_input_stops_at_last_complete_pair() {
        // latitude of the second pair present, longitude missing
        assert_eq!(decode("_p~iF~ps|U_ulL").len(), 1);
        // dangling continuation byte
        assert_eq!(decode("_p~iF~ps|U_").len(), 1);
    }

    #[test]
    fn bytes_outside_alphabet_stop_decoding() {
        assert_eq!(decode("_p~iF~ps|U\n_ulLnnqC").len(), 1);
        assert!(decode(" ").is_empty());
    }

    #[test]
    fn zero_deltas_repeat_previous_point() {
        let points = decode("}qfeHyn|bB??");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], points[1]);
    }

    #[test]
    fn encodes_reference_polyline() {
        let points = [
            Point::from_e6(38_500_000, -120_200_000),
            Point::from_e6(40_700_000, -120_950_000),
            Point::from_e6(43_252_000, -126_453_000),
        ];
        assert_eq!(encode(&points), GOOGLE_REFERENCE);
    }

    #[test]
    fn encode_rounds_to_format_precision() {
        let encoded = encode(&[Point::from_e6(48_207_834, 16_371_166)]);
        assert_eq!(decode(&encoded), vec![Point::from_e6(48_207_830, 16_371_170)]);
    }

    #[test]
    fn forty_four_point_route_keeps_endpoints() {
        let first = Point::from_e6(48_207_830, 16_371_170);
        let last = Point::from_e6(48_205_140, 16_357_960);
        let mut route = vec![first];
        for step in 1..43 {
            route.push(Point::from_e6(
                48_207_830 - step * 60,
                16_371_170 - step * 300,
            ));
        }
        route.push(last);
        assert_eq!(route.len(), 44);

        let points = decode(&encode(&route));
        assert_eq!(points.len(), 44);
        assert_eq!(points[0], first);
        assert_eq!(points[43], last);
    }
}
