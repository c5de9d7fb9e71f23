use eframe::egui::Color32;
use palette::{IntoColor, Lab, Mix, Srgb};

// ---------------------------------------------------------------------------
// Continuous colour maps
// ---------------------------------------------------------------------------

/// The colour maps the dashboard draws with, defined by evenly spaced stops
/// and interpolated in sRGB like their matplotlib namesakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    GreensR,
    RedsR,
    Viridis,
    Coolwarm,
}

const GREENS: [[u8; 3]; 9] = [
    [0xf7, 0xfc, 0xf5],
    [0xe5, 0xf5, 0xe0],
    [0xc7, 0xe9, 0xc0],
    [0xa1, 0xd9, 0x9b],
    [0x74, 0xc4, 0x76],
    [0x41, 0xab, 0x5d],
    [0x23, 0x8b, 0x45],
    [0x00, 0x6d, 0x2c],
    [0x00, 0x44, 0x1b],
];

const REDS: [[u8; 3]; 9] = [
    [0xff, 0xf5, 0xf0],
    [0xfe, 0xe0, 0xd2],
    [0xfc, 0xbb, 0xa1],
    [0xfc, 0x92, 0x72],
    [0xfb, 0x6a, 0x4a],
    [0xef, 0x3b, 0x2c],
    [0xcb, 0x18, 0x1d],
    [0xa5, 0x0f, 0x15],
    [0x67, 0x00, 0x0d],
];

const VIRIDIS: [[u8; 3]; 9] = [
    [0x44, 0x01, 0x54],
    [0x47, 0x2d, 0x7b],
    [0x3b, 0x52, 0x8b],
    [0x2c, 0x72, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x28, 0xae, 0x80],
    [0x5e, 0xc9, 0x62],
    [0xad, 0xdc, 0x30],
    [0xfd, 0xe7, 0x25],
];

const COOLWARM: [[u8; 3]; 9] = [
    [0x3b, 0x4c, 0xc0],
    [0x62, 0x82, 0xea],
    [0x8d, 0xb0, 0xfe],
    [0xb8, 0xd0, 0xf9],
    [0xdd, 0xdc, 0xdc],
    [0xf5, 0xc4, 0xad],
    [0xf4, 0x9a, 0x7b],
    [0xde, 0x60, 0x4d],
    [0xb4, 0x04, 0x26],
];

/// Histogram fill.
pub const SKY_BLUE: Color32 = Color32::from_rgb(0x87, 0xce, 0xeb);

impl Palette {
    fn stops(self) -> (&'static [[u8; 3]], bool) {
        match self {
            Palette::GreensR => (&GREENS, true),
            Palette::RedsR => (&REDS, true),
            Palette::Viridis => (&VIRIDIS, false),
            Palette::Coolwarm => (&COOLWARM, false),
        }
    }

    /// Colour at position `t` in `[0, 1]` (clamped).
    pub fn at(self, t: f32) -> Color32 {
        let (stops, reversed) = self.stops();
        let t = t.clamp(0.0, 1.0);
        let t = if reversed { 1.0 - t } else { t };

        let scaled = t * (stops.len() - 1) as f32;
        let lo = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lo as f32;

        let a = to_srgb(stops[lo]);
        let b = to_srgb(stops[lo + 1]);
        let mixed: Srgb<u8> = a.mix(b, frac).into_format();
        Color32::from_rgb(mixed.red, mixed.green, mixed.blue)
    }

    /// `n` colours drawn from the interior of the map, skipping both ends.
    pub fn discrete(self, n: usize) -> Vec<Color32> {
        (1..=n)
            .map(|i| self.at(i as f32 / (n + 1) as f32))
            .collect()
    }
}

fn to_srgb([r, g, b]: [u8; 3]) -> Srgb {
    Srgb::<u8>::new(r, g, b).into_format()
}

/// Black or white, whichever reads better on `fill`.
pub fn contrast_text(fill: Color32) -> Color32 {
    let lab: Lab = to_srgb([fill.r(), fill.g(), fill.b()]).into_color();
    if lab.l > 60.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_stops() {
        assert_eq!(Palette::Viridis.at(0.0), Color32::from_rgb(0x44, 0x01, 0x54));
        assert_eq!(Palette::Viridis.at(1.0), Color32::from_rgb(0xfd, 0xe7, 0x25));
        assert_eq!(Palette::Coolwarm.at(-3.0), Palette::Coolwarm.at(0.0));
    }

    #[test]
    fn reversed_maps_start_dark() {
        assert_eq!(Palette::GreensR.at(0.0), Color32::from_rgb(0x00, 0x44, 0x1b));
        assert_eq!(Palette::RedsR.at(1.0), Color32::from_rgb(0xff, 0xf5, 0xf0));
    }

    #[test]
    fn discrete_skips_extremes() {
        let colors = Palette::GreensR.discrete(10);
        assert_eq!(colors.len(), 10);
        assert_ne!(colors[0], Palette::GreensR.at(0.0));
        assert_ne!(colors[9], Palette::GreensR.at(1.0));
        assert!(Palette::Viridis.discrete(0).is_empty());
    }

    #[test]
    fn text_contrast() {
        assert_eq!(contrast_text(Color32::WHITE), Color32::BLACK);
        assert_eq!(contrast_text(Palette::Coolwarm.at(0.0)), Color32::WHITE);
        assert_eq!(contrast_text(Palette::Coolwarm.at(0.5)), Color32::BLACK);
    }
}
