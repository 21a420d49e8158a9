//! Decimal-degree to degrees/minutes/seconds conversion.
//!
//! Two display styles share one decomposition:
//!
//! - [`DmsStyle::Verbose`] renders `6°10'12.000"N` (seconds to three decimals,
//!   degrees and minutes unpadded). Used in detail views.
//! - [`DmsStyle::Compact`] renders `06°10'12"N` (everything rounded and
//!   zero-padded to two digits). Used inside notification messages.
//!
//! Seconds that round up to 60 are not carried into the minutes field, so the
//! compact style can print `60"` for values just below a full minute.

use std::fmt;

/// Which coordinate a decimal value belongs to. Decides the hemisphere letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Rendering style for a DMS string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DmsStyle {
    /// `{d}°{m}'{s:.3}"{dir}`
    Verbose,
    /// `{d:02}°{m:02}'{round(s):02}"{dir}`
    #[default]
    Compact,
}

/// A coordinate split into sexagesimal parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
    pub direction: char,
}

impl Dms {
    /// Decomposes `decimal` into degrees, minutes and fractional seconds.
    ///
    /// Returns `None` for NaN and infinite input.
    pub fn from_decimal(decimal: f64, axis: Axis) -> Option<Self> {
        if !decimal.is_finite() {
            return None;
        }

        let abs = decimal.abs();
        let degrees = abs.floor();
        let minutes_float = (abs - degrees) * 60.0;
        let minutes = minutes_float.floor();
        let seconds = (minutes_float - minutes) * 60.0;

        let direction = match (axis, decimal >= 0.0) {
            (Axis::Latitude, true) => 'N',
            (Axis::Latitude, false) => 'S',
            (Axis::Longitude, true) => 'E',
            (Axis::Longitude, false) => 'W',
        };

        Some(Self {
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds,
            direction,
        })
    }

    /// Renders the parts in the requested style.
    pub fn render(&self, style: DmsStyle) -> String {
        match style {
            DmsStyle::Verbose => format!(
                "{}°{}'{:.3}\"{}",
                self.degrees, self.minutes, self.seconds, self.direction
            ),
            DmsStyle::Compact => format!(
                "{:02}°{:02}'{:02}\"{}",
                self.degrees,
                self.minutes,
                self.seconds.round() as u32,
                self.direction
            ),
        }
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DmsStyle::Verbose))
    }
}

/// Converts a decimal coordinate to a DMS string, or `""` when the value is
/// absent or not a number.
pub fn to_dms(decimal: Option<f64>, axis: Axis, style: DmsStyle) -> String {
    decimal
        .and_then(|d| Dms::from_decimal(d, axis))
        .map(|dms| dms.render(style))
        .unwrap_or_default()
}

/// Latitude and longitude DMS strings joined with no separator.
///
/// Empty when either half is unavailable.
pub fn format_location(lat: Option<f64>, lng: Option<f64>, style: DmsStyle) -> String {
    let lat = to_dms(lat, Axis::Latitude, style);
    let lng = to_dms(lng, Axis::Longitude, style);
    if lat.is_empty() || lng.is_empty() {
        return String::new();
    }
    format!("{lat}{lng}")
}
