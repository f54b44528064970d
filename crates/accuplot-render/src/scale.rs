//! Transformaciones de eje. Se dibuja en el espacio transformado y las
//! etiquetas de ticks se calculan con la inversa.
use accuplot_core::model::ScaleKind;

/// Umbral lineal de `symlog` (default de matplotlib).
pub const SYMLOG_LINTHRESH: f64 = 2.0;
/// Ancho lineal de `asinh`.
pub const ASINH_LINEAR_WIDTH: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    pub kind: ScaleKind,
    pub base: f64,
}

impl AxisTransform {
    pub fn new(kind: ScaleKind, base: f64) -> Self {
        let base = if base > 1.0 { base } else { 10.0 };
        Self { kind, base }
    }

    fn linscale_adj(&self) -> f64 {
        1.0 / (1.0 - 1.0 / self.base)
    }

    /// Valor en espacio de dibujo; `None` si no es representable (log de
    /// un no positivo, no finitos).
    pub fn forward(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        let t = match self.kind {
            ScaleKind::Linear => v,
            ScaleKind::Log if v > 0.0 => v.log(self.base),
            ScaleKind::Log => return None,
            ScaleKind::Symlog => {
                let lt = SYMLOG_LINTHRESH;
                if v.abs() <= lt {
                    v * self.linscale_adj()
                } else {
                    v.signum() * lt * (self.linscale_adj() + (v.abs() / lt).log(self.base))
                }
            }
            ScaleKind::Asinh => ASINH_LINEAR_WIDTH * (v / ASINH_LINEAR_WIDTH).asinh(),
        };
        Some(t)
    }

    pub fn inverse(&self, t: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => t,
            ScaleKind::Log => self.base.powf(t),
            ScaleKind::Symlog => {
                let lt = SYMLOG_LINTHRESH;
                let adj = self.linscale_adj();
                if t.abs() <= lt * adj {
                    t / adj
                } else {
                    t.signum() * lt * self.base.powf(t.abs() / lt - adj)
                }
            }
            ScaleKind::Asinh => ASINH_LINEAR_WIDTH * (t / ASINH_LINEAR_WIDTH).sinh(),
        }
    }
}
