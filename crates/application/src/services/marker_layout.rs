//! Marker placement for the planner's points

use domain::{GeoPoint, StopList};

use crate::ports::{Marker, MarkerKind};

/// Dot color of the origin marker (green)
pub const ORIGIN_COLOR: &str = "#16a34a";
/// Dot color of the destination marker (red)
pub const DESTINATION_COLOR: &str = "#dc2626";
/// Dot color of stop markers (violet)
pub const STOP_COLOR: &str = "#7c3aed";

/// Markers for every placed point: origin, destination, then stops
///
/// Stops are numbered among the placed stops only, in route order.
pub fn layout_markers(
    origin: Option<(GeoPoint, &str)>,
    destination: Option<(GeoPoint, &str)>,
    stops: &StopList,
) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(2 + stops.len());

    if let Some((position, label)) = origin {
        markers.push(Marker {
            position,
            kind: MarkerKind::Origin,
            title: "Origin".to_string(),
            label: label.to_string(),
            color: ORIGIN_COLOR,
        });
    }

    if let Some((position, label)) = destination {
        markers.push(Marker {
            position,
            kind: MarkerKind::Destination,
            title: "Destination".to_string(),
            label: label.to_string(),
            color: DESTINATION_COLOR,
        });
    }

    let placed = stops
        .iter()
        .filter_map(|stop| stop.position.map(|position| (position, stop.label.as_str())));
    for (index, (position, label)) in placed.enumerate() {
        let number = index + 1;
        markers.push(Marker {
            position,
            kind: MarkerKind::Stop(number),
            title: format!("Stop {number}"),
            label: label.to_string(),
            color: STOP_COLOR,
        });
    }

    markers
}
