// SPDX-License-Identifier: Apache-2.0

// Example demonstrating PagedSource over a simulated flash device

use std::cell::Cell;

use flashjson::{CharSource, JsonValue, PageRead, PagedSource, ParseError};

/// Flash memory that can only be read by copying whole blocks into RAM.
/// Counts every copy so the effect of the cache is visible.
struct SimulatedFlash<'a> {
    data: &'a [u8],
    copies: Cell<usize>,
}

impl<'a> SimulatedFlash<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            copies: Cell::new(0),
        }
    }
}

impl PageRead for SimulatedFlash<'_> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        self.copies.set(self.copies.get() + 1);
        self.data.read_at(offset, buf)
    }
}

// Stored alongside the firmware constants
static CONFIG: &[u8] = br#"{"wifi": {"ssid": "lab-net", "channel": 6}, "sensors": ["t0", "t1", "h0"], "motd": "hello\nworld"}"#;
static NAMES: &[u8] = b"sensors\0";

fn report<B: PageRead, const N: usize>(flash: &PagedSource<B, N>) -> Result<(), ParseError> {
    let root = JsonValue::new(flash);

    let ssid = root.get_property("wifi").get_property("ssid").materialize()?;
    println!("  ssid    = {ssid}");

    let names = PagedSource::new(NAMES);
    let sensors = root.get_property_in(&names, 0);
    for sensor in sensors.items() {
        println!("  sensor  = {}", sensor.materialize()?);
    }

    println!("  motd    = {:?}", root.get_property("motd").materialize()?);
    println!("  length  = {} bytes", flash.len());
    Ok(())
}

fn main() -> Result<(), ParseError> {
    println!("4-byte window (default):");
    let flash = PagedSource::new(SimulatedFlash::new(CONFIG));
    report(&flash)?;
    println!("  flash copies: {}", flash.backing().copies.get());

    println!();
    println!("32-byte window:");
    let flash = PagedSource::<_, 32>::with_window(SimulatedFlash::new(CONFIG));
    report(&flash)?;
    println!("  flash copies: {}", flash.backing().copies.get());

    Ok(())
}
