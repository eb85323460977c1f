//! GPX 1.1 output for generated tracks.

use std::fmt::Write as _;

use profile::geometry::GeoPoint;

/// Render `points` as a single-segment GPX 1.1 track. Points without an
/// altitude are written without an `<ele>` element.
pub fn write_gpx(points: &[GeoPoint], track_name: &str) -> String {
    let name = escape_xml(track_name);
    let mut gpx = String::with_capacity(200 + points.len() * 80);

    gpx.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    gpx.push_str(
        "<gpx version=\"1.1\" creator=\"gradient-profile-test-data\" \
         xmlns=\"http://www.topografix.com/GPX/1/1\">\n",
    );
    let _ = writeln!(gpx, "  <metadata>\n    <name>{name}</name>\n  </metadata>");
    let _ = writeln!(gpx, "  <trk>\n    <name>{name}</name>\n    <trkseg>");

    for point in points {
        let _ = write!(
            gpx,
            "      <trkpt lat=\"{:.7}\" lon=\"{:.7}\">",
            point.latitude, point.longitude
        );
        if let Some(ele) = point.altitude {
            let _ = write!(gpx, "<ele>{ele:.2}</ele>");
        }
        gpx.push_str("</trkpt>\n");
    }

    gpx.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
    gpx
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
