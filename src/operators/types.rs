use ndarray::Array1;

/// Evaluation points on the argument axis.
pub type Points = Array1<f64>;

/// Operator outputs aligned with a [`Points`] array.
pub type Values = Array1<f64>;

/// Default sample count for fixed-grid quadrature.
pub const DEFAULT_N_POINTS: usize = 101;

/// Auto-selected finite-difference step, as a fraction of point spacing.
pub const DEFAULT_STEP_FRACTION: f64 = 0.01;

/// Relative step used when only a single evaluation point is available.
pub const SINGLE_POINT_RELATIVE_STEP: f64 = 1e-8;

/// R² threshold above which a linearization is declared linear.
pub const LINEARITY_R2_THRESHOLD: f64 = 0.999;

/// Shrinking step multipliers tried by the adaptive derivative.
pub const ADAPTIVE_STEP_FACTORS: [f64; 5] = [1.0, 0.5, 0.25, 0.125, 0.0625];

/// Recursion depth cap for adaptive Simpson quadrature.
pub const ADAPTIVE_QUAD_MAX_DEPTH: usize = 30;

/// Target absolute error for adaptive Simpson quadrature.
pub const ADAPTIVE_QUAD_TOL: f64 = 1e-10;
