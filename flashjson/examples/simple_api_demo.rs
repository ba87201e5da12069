// SPDX-License-Identifier: Apache-2.0

// Example demonstrating navigation of a JSON document held in RAM

use flashjson::{JsonValue, ParseError};

fn main() -> Result<(), ParseError> {
    let json = br#"{
        "device": "thermostat",
        "setpoint": 21.5,
        "schedule": [
            {"time": "07:00", "temp": 21},
            {"time": "22:30", "temp": 17}
        ],
        "label": "Living\troom"
    }"#;

    println!("Input: {}", core::str::from_utf8(json).map_err(ParseError::from)?);
    println!();

    let root = JsonValue::new(&json[..]);

    println!("device   = {}", root.get_property("device").as_str()?);
    println!("setpoint = {}", root.get_property("setpoint").as_str()?);
    println!("label    = {:?}", root.get_property("label").materialize()?);

    println!();
    println!("Schedule:");
    for entry in root.get_property("schedule").items() {
        println!(
            "  {} -> {}",
            entry.get_property("time").as_str()?,
            entry.get_property("temp").as_str()?
        );
    }

    println!();
    println!("Members:");
    for (name, value) in root.members() {
        let kind = if value.is_object() {
            "object"
        } else if value.is_array() {
            "array"
        } else if value.is_quoted() {
            "string"
        } else {
            "scalar"
        };
        println!("  {name}: {kind} at {:?}", value.raw_span());
    }

    let missing = root.get_property("humidity");
    println!();
    println!("humidity present: {}", missing.is_valid());
    Ok(())
}
