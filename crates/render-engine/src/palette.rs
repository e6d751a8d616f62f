//! Named ink colors and the pinch cycle order.

use airsketch_sketch_model::geometry::Rgb;

/// The fixed ink palette, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette;

impl Palette {
    pub const ENTRIES: [(&'static str, Rgb); 8] = [
        ("red", Rgb::new(255, 0, 0)),
        ("blue", Rgb::new(0, 0, 255)),
        ("green", Rgb::new(0, 255, 0)),
        ("yellow", Rgb::new(255, 255, 0)),
        ("cyan", Rgb::new(0, 255, 255)),
        ("magenta", Rgb::new(255, 0, 255)),
        ("white", Rgb::WHITE),
        ("black", Rgb::BLACK),
    ];

    /// Look a color up by name, ignoring case. Unknown names map to white.
    pub fn lookup(name: &str) -> Rgb {
        Self::ENTRIES
            .iter()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(name.trim()))
            .map(|(_, color)| *color)
            .unwrap_or(Rgb::WHITE)
    }

    /// Name of a palette color, if it is one.
    pub fn name_of(color: Rgb) -> Option<&'static str> {
        Self::ENTRIES
            .iter()
            .find(|(_, entry)| *entry == color)
            .map(|(name, _)| *name)
    }

    /// The entry after `color` in cycle order, wrapping around. Colors not
    /// in the palette restart the cycle at the first entry.
    pub fn next_after(color: Rgb) -> Rgb {
        match Self::ENTRIES.iter().position(|(_, entry)| *entry == color) {
            Some(i) => Self::ENTRIES[(i + 1) % Self::ENTRIES.len()].1,
            None => Self::ENTRIES[0].1,
        }
    }
}
