//! Human-readable text for OSRM maneuvers (English)

use crate::models::OsrmStep;

/// Describe a step the way a turn-by-turn panel shows it
///
/// `leg_index` and `is_last_leg` decide whether an `arrive` maneuver reaches
/// an intermediate stop or the destination.
pub fn describe(step: &OsrmStep, leg_index: usize, is_last_leg: bool) -> String {
    let maneuver = &step.maneuver;
    let road = road_name(step);
    let modifier = maneuver.modifier.as_deref().unwrap_or("straight");

    match maneuver.kind.as_str() {
        "depart" => {
            let heading = maneuver.bearing_after.map_or("out", compass_direction);
            with_road(format!("Head {heading}"), "on", road)
        },
        "arrive" if is_last_leg => "You have arrived at your destination".to_string(),
        "arrive" => format!("You have reached stop {}", leg_index + 1),
        "roundabout" | "rotary" => match maneuver.exit {
            Some(exit) => with_road(
                format!("Enter the roundabout and take the {} exit", ordinal(exit)),
                "onto",
                road,
            ),
            None => with_road("Enter the roundabout".to_string(), "towards", road),
        },
        "exit roundabout" | "exit rotary" => with_road("Exit the roundabout".to_string(), "onto", road),
        "merge" => with_road(format!("Merge {}", side(modifier)), "onto", road),
        "on ramp" => with_road(format!("Take the ramp {}", side(modifier)), "onto", road),
        "off ramp" => with_road(format!("Take the exit {}", side(modifier)), "onto", road),
        "fork" => with_road(format!("Keep {} at the fork", side(modifier)), "onto", road),
        "end of road" => with_road(
            format!("Turn {} at the end of the road", side(modifier)),
            "onto",
            road,
        ),
        "continue" | "new name" if modifier == "straight" => with_road("Continue".to_string(), "on", road),
        _ => with_road(turn_phrase(modifier), "onto", road),
    }
}

fn road_name(step: &OsrmStep) -> Option<&str> {
    if !step.name.is_empty() {
        return Some(step.name.as_str());
    }
    step.road_ref.as_deref().filter(|r| !r.is_empty())
}

fn with_road(phrase: String, preposition: &str, road: Option<&str>) -> String {
    match road {
        Some(name) => format!("{phrase} {preposition} {name}"),
        None => phrase,
    }
}

fn turn_phrase(modifier: &str) -> String {
    match modifier {
        "uturn" => "Make a U-turn".to_string(),
        "straight" => "Go straight".to_string(),
        other => format!("Turn {other}"),
    }
}

fn side(modifier: &str) -> &str {
    match modifier {
        "left" | "slight left" | "sharp left" => "left",
        "right" | "slight right" | "sharp right" => "right",
        _ => "straight",
    }
}

fn compass_direction(bearing: f64) -> &'static str {
    const DIRECTIONS: [&str; 8] = [
        "north",
        "northeast",
        "east",
        "southeast",
        "south",
        "southwest",
        "west",
        "northwest",
    ];
    let normalized = bearing.rem_euclid(360.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = ((normalized + 22.5) / 45.0) as usize % DIRECTIONS.len();
    DIRECTIONS[index]
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
