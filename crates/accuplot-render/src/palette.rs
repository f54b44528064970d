//! Paleta "deep" de seaborn.
use plotters::style::RGBColor;

pub const DEEP: [RGBColor; 10] = [RGBColor(76, 114, 176),
                                  RGBColor(221, 132, 82),
                                  RGBColor(85, 168, 104),
                                  RGBColor(196, 78, 82),
                                  RGBColor(129, 114, 179),
                                  RGBColor(147, 120, 96),
                                  RGBColor(218, 139, 195),
                                  RGBColor(140, 140, 140),
                                  RGBColor(204, 185, 116),
                                  RGBColor(100, 181, 205)];

/// Color de la serie de referencia.
pub const HIGHLIGHT: RGBColor = RGBColor(255, 0, 0);

/// Color `index` desplazado `offset` posiciones, cíclico.
pub fn deep(index: usize, offset: usize) -> RGBColor {
    DEEP[(index + offset) % DEEP.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_wraparound() {
        assert_eq!(deep(0, 0), DEEP[0]);
        assert_eq!(deep(0, 2), DEEP[2]);
        assert_eq!(deep(9, 1), DEEP[0]);
    }
}
