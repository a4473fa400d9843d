//! Piecewise linear colormaps for surface and land shading.

use plotters::style::RGBColor;

/// Color stops at positions in `[0, 1]`, sorted ascending
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<(f64, RGBColor)>,
}

fn rgb(r: f64, g: f64, b: f64) -> RGBColor {
    RGBColor((r * 255.0).round() as u8, (g * 255.0).round() as u8, (b * 255.0).round() as u8)
}

impl Colormap {
    pub fn new(mut stops: Vec<(f64, RGBColor)>) -> Colormap {
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Colormap { stops }
    }

    /// Blue through white to red, with lighter shoulders near zero
    pub fn tsunami() -> Colormap {
        Colormap::new(vec![
            (0.0, rgb(0.0, 0.0, 1.0)),
            (0.25, rgb(0.5, 0.5, 1.0)),
            (0.5, rgb(1.0, 1.0, 1.0)),
            (0.75, rgb(1.0, 0.5, 0.5)),
            (1.0, rgb(1.0, 0.0, 0.0)),
        ])
    }

    pub fn blue_white_red() -> Colormap {
        Colormap::new(vec![
            (0.0, rgb(0.0, 0.0, 1.0)),
            (0.5, rgb(1.0, 1.0, 1.0)),
            (1.0, rgb(1.0, 0.0, 0.0)),
        ])
    }

    /// Greens for low ground, browning with elevation
    pub fn land() -> Colormap {
        Colormap::new(vec![
            (0.0, rgb(0.0, 0.3, 0.0)),
            (0.25, rgb(0.0, 1.0, 0.0)),
            (0.5, rgb(0.8, 1.0, 0.5)),
            (1.0, rgb(0.8, 0.5, 0.2)),
        ])
    }

    /// Color for `value` scaled into `range`; out of range values clamp to
    /// the end colors. NaN has no color.
    pub fn color(&self, value: f64, range: (f64, f64)) -> Option<RGBColor> {
        if value.is_nan() || self.stops.is_empty() {
            return None;
        }
        let (lo, hi) = range;
        let s = if hi > lo { ((value - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.5 };
        let upper = self.stops.iter().position(|(pos, _)| *pos >= s);
        let color = match upper {
            None => self.stops[self.stops.len() - 1].1,
            Some(0) => self.stops[0].1,
            Some(k) => {
                let (p0, c0) = self.stops[k - 1];
                let (p1, c1) = self.stops[k];
                let w = if p1 > p0 { (s - p0) / (p1 - p0) } else { 0.0 };
                let mix = |a: u8, b: u8| (a as f64 + w * (b as f64 - a as f64)).round() as u8;
                RGBColor(mix(c0.0, c1.0), mix(c0.1, c1.1), mix(c0.2, c1.2))
            }
        };
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsunami_endpoints_and_center() {
        let cmap = Colormap::tsunami();
        assert_eq!(cmap.color(-0.5, (-0.5, 0.5)), Some(RGBColor(0, 0, 255)));
        assert_eq!(cmap.color(0.0, (-0.5, 0.5)), Some(RGBColor(255, 255, 255)));
        assert_eq!(cmap.color(0.5, (-0.5, 0.5)), Some(RGBColor(255, 0, 0)));
    }

    #[test]
    fn test_clamps_and_nan() {
        let cmap = Colormap::blue_white_red();
        assert_eq!(cmap.color(50.0, (-10.0, 10.0)), Some(RGBColor(255, 0, 0)));
        assert_eq!(cmap.color(-50.0, (-10.0, 10.0)), Some(RGBColor(0, 0, 255)));
        assert_eq!(cmap.color(f64::NAN, (-10.0, 10.0)), None);
    }

    #[test]
    fn test_interpolates_between_stops() {
        let cmap = Colormap::blue_white_red();
        assert_eq!(cmap.color(-5.0, (-10.0, 10.0)), Some(RGBColor(128, 128, 255)));
    }
}
