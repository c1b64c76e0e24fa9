//! Core data types for the parts inventory.
//!
//! - [`InventoryRecord`](record::InventoryRecord): one component line item
//! - [`ManualEntry`](record::ManualEntry): fields typed in when adding by hand
//! - [`RecordId`](types::RecordId), [`Source`](types::Source): identity and origin
//! - [`Tag`](tags::Tag): fixed category taxonomy and the rules that assign it
//!
//! ## Tags
//!
//! | Tag | Matched by (case-insensitive) |
//! |-----|-------------------------------|
//! | Keyboard Switch | `key/mech/push switch`, `cherry`, `gateron`, `kailh`, `<n>gf` |
//! | Resistor | a value in Ω or ohm, `res`, `resistor` |
//! | Capacitor | `nF`/`uF`/`µF` values, `cap`, `capacitor` |
//! | Inductor | `nH`/`uH`/`µH` values, `ind`, `inductor` |
//! | Diode | `diode`, `rectifier`, `1N4xxx` |
//! | LED | `led`, `light emitting` |
//! | MCU | `mcu`, `microcontroller`, `stm32`, `esp32`, `atmega`, `pic1`, `ch32`, `ch5` |
//! | Connector | `header`, `conn`, `socket`, `usb`, `jst` |
//! | IC | `ic`, `chip`, `sop-`, `qfn-`, `dip-` |
//!
//! A text that tags as Inductor never also tags as Resistor.

pub mod record;
pub mod tags;
pub mod types;
