//! Constantes del motor de replot.
//!
//! `RENDERER_VERSION` forma parte del input de cada fingerprint: subirla
//! invalida todos los plots cacheados aunque ninguna configuración cambie.

/// Versión lógica del dibujado. Subir cuando cambie la salida del renderer
/// de forma incompatible.
pub const RENDERER_VERSION: &str = "R1.0";

/// Clave reservada de la fila de timestamp global en el hash store.
pub const LAST_MODIFIED_KEY: &str = "@last_modified";

/// Cabecera del hash store CSV.
pub const STORE_HEADER: [&str; 2] = ["id", "fingerprint"];

/// Sufijo de la serie de referencia que se dibuja una sola vez.
pub const DEFAULT_REFERENCE_SUFFIX: &str = "(torch)";

/// Menor valor normal de f32 (2^-126); por debajo se considera subnormal.
pub const MIN_NORMAL_F32: f64 = 1.175_494_350_822_287_5e-38;
