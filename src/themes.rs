use crate::rendering::Rgb;

/// Colour palette applied to every rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub gradient: [Rgb; 2],
    pub snake: Rgb,
    pub food: Rgb,
    pub power_up: Rgb,
}

pub const THEMES: [Theme; 3] = [
    Theme {
        name: "Jungle",
        gradient: [Rgb::hex(0x1a1a1d), Rgb::hex(0x4caf50)],
        snake: Rgb::hex(0x4caf50),
        food: Rgb::hex(0xff5722),
        power_up: Rgb::hex(0xffc107),
    },
    Theme {
        name: "Amethyst",
        gradient: [Rgb::hex(0x2c3e50), Rgb::hex(0x8e44ad)],
        snake: Rgb::hex(0x8e44ad),
        food: Rgb::hex(0xe74c3c),
        power_up: Rgb::hex(0xf39c12),
    },
    Theme {
        name: "Lagoon",
        gradient: [Rgb::hex(0x34495e), Rgb::hex(0x16a085)],
        snake: Rgb::hex(0x16a085),
        food: Rgb::hex(0xc0392b),
        power_up: Rgb::hex(0xd35400),
    },
];

/// Theme for `index`, wrapping around the catalog.
pub fn theme(index: usize) -> &'static Theme {
    &THEMES[index % THEMES.len()]
}

pub fn next_theme_index(index: usize) -> usize {
    (index + 1) % THEMES.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_wraps_to_first_theme() {
        let mut index = 0;
        for _ in 0..THEMES.len() {
            index = next_theme_index(index);
        }
        assert_eq!(index, 0);
    }

    #[test]
    fn theme_lookup_never_panics() {
        assert_eq!(theme(THEMES.len()).name, THEMES[0].name);
    }
}
