// SPDX-License-Identifier: Apache-2.0

use core::marker::PhantomData;
use core::num::Saturating;

/// Nesting depth counter used while skipping over nested structures.
///
/// NOTE: Unbalanced input (an extra `]` or `}`) decrements a counter that is
/// already zero. Plain unsigned integers wrap around, after which the skip no
/// longer sees itself at the top level and runs to the end of the buffer.
/// [`Saturating`] counters clamp at zero instead.
pub trait DepthCounter: Copy + Default + PartialEq + core::fmt::Debug {
    /// Enter one level of nesting.
    fn increment(&mut self);
    /// Leave one level of nesting.
    fn decrement(&mut self);
    /// True at the level where the scan started.
    fn is_zero(&self) -> bool;
}

macro_rules! impl_depth_counter {
    ($($t:ty),*) => {
        $(
            impl DepthCounter for $t {
                fn increment(&mut self) {
                    *self = self.wrapping_add(1);
                }
                fn decrement(&mut self) {
                    *self = self.wrapping_sub(1);
                }
                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }

            impl DepthCounter for Saturating<$t> {
                fn increment(&mut self) {
                    self.0 = self.0.saturating_add(1);
                }
                fn decrement(&mut self) {
                    self.0 = self.0.saturating_sub(1);
                }
                fn is_zero(&self) -> bool {
                    self.0 == 0
                }
            }
        )*
    };
}

impl_depth_counter!(u8, u16, u32, usize);

/// Configuration trait for scans - defines the depth counter type
pub trait ScanConfig {
    type Counter: DepthCounter;
}

/// Default configuration: `u8` wrapping counters.
///
/// Nesting deeper than 255 levels inside a skipped value wraps the counter;
/// pick a wider counter through [`DepthConfig`] for such documents.
#[derive(Debug)]
pub struct DefaultConfig;

impl ScanConfig for DefaultConfig {
    type Counter = u8;
}

/// User-facing configuration struct for custom counter types
///
/// Usage: `DepthConfig<u16>` for deeper nesting, `DepthConfig<Saturating<u8>>`
/// to clamp on unbalanced closers.
///
/// ```rust
/// # use flashjson::{DepthConfig, JsonValue};
/// let json = br#"{"deep": [[[1]]]}"#;
/// let root = JsonValue::<_, DepthConfig<u16>>::with_config(&json[..]);
/// assert!(root.get_property("deep").is_array());
/// ```
#[derive(Debug)]
pub struct DepthConfig<D> {
    _phantom: PhantomData<D>,
}

impl<D: DepthCounter> ScanConfig for DepthConfig<D> {
    type Counter = D;
}

/// `u8` counters that stop at zero when closers outnumber openers.
pub type SaturatingConfig = DepthConfig<Saturating<u8>>;
