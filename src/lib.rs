//! meta_calculus — non-Newtonian calculus operators with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the meta-calculus toolkit to Python via the `_meta_calculus`
//! extension module. The crate builds derivative and integral operators
//! from invertible generator transforms, applies them to speculative
//! physics workloads, and checks whether results survive swapping the
//! calculus scheme.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`calculus`, `operators`, `solvers`,
//!   `applications`, `scheme`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for
//!   the `_meta_calculus` Python extension.
//! - Create and register Python submodules (`operators`, `applications`)
//!   under `meta_calculus` so dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs
//!   only FFI glue, input validation, and error mapping.
//! - The Python-visible types mirror the invariants of their Rust
//!   counterparts: constructors are the only fallible surface, and
//!   evaluation follows the never-throw substitution contract.
//! - A Python callable that raises mid-evaluation surfaces as NaN to the
//!   operator layer (see `utils::scalar_callable`), which reports it
//!   through the operators' non-finite checks.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_meta_calculus.<submodule>` and
//!   are wrapped by thin pure-Python facades in the `meta_calculus`
//!   package.
//! - Errors from core Rust code are rich enums internally and become
//!   `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on the inner modules (or the crate
//!   `prelude`) and can ignore the PyO3 items guarded by the
//!   `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner
//!   modules and by the integration suite under `tests/`; binding smoke
//!   tests live on the Python side.

pub mod applications;
pub mod calculus;
pub mod operators;
pub mod scheme;
pub mod solvers;
pub mod utils;

/// Curated surface for Rust callers: generator, operator, solver,
/// application, and scheme types in one import.
pub mod prelude {
    pub use crate::applications::prelude::*;
    pub use crate::calculus::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::scheme::prelude::*;
    pub use crate::solvers::prelude::*;
}

#[cfg(feature = "python-bindings")]
use std::sync::Arc;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    applications::{blackhole::BlackHoleEvolution, units::UnitSystem},
    calculus::{generators::AnyGenerator, weights::WeightFn},
    operators::{
        derivatives::{AdaptiveMetaDerivative, UnifiedDerivative},
        integration::MetaIntegral,
        linearization::{straight_line_test, LinearizationOutcome},
        types::DEFAULT_N_POINTS,
    },
    solvers::ivp::IvpOptions,
    utils::{
        extract_f64_array, extract_fd_method, extract_generator, extract_quadrature_method,
        scalar_callable,
    },
};

// Wrap an optional Python callable as a GIL-reacquiring WeightFn; a
// raising callable reads as NaN, per the substitution contract.
#[cfg(feature = "python-bindings")]
fn extract_weight(w: Option<&Bound<'_, PyAny>>) -> Option<WeightFn> {
    w.map(|obj| {
        let obj: Py<PyAny> = obj.clone().unbind();
        Arc::new(move |x: f64| {
            Python::with_gil(|py| {
                obj.bind(py)
                    .call1((x,))
                    .and_then(|v| v.extract::<f64>())
                    .unwrap_or(f64::NAN)
            })
        }) as WeightFn
    })
}

/// Derivative — Python-facing unified meta-derivative operator.
///
/// Purpose
/// -------
/// Expose the generator-chain, weight-rescaled finite-difference
/// derivative to Python. Constructed from generator names (plus optional
/// parameters for `power` and `scale_dependent`), optional weight
/// callables, and a finite-difference method; `differentiate` accepts
/// any scalar Python callable and a 1-D array of points.
///
/// Notes
/// -----
/// - `adaptive=True` switches to per-point Richardson step refinement.
/// - Native Rust code should use [`UnifiedDerivative`] or
///   [`AdaptiveMetaDerivative`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "meta_calculus.operators")]
pub struct Derivative {
    alpha: AnyGenerator,
    beta: AnyGenerator,
    u: Option<WeightFn>,
    v: Option<WeightFn>,
    method: crate::operators::derivatives::FdMethod,
    adaptive: bool,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Derivative {
    #[new]
    #[pyo3(
        signature = (
            alpha = None,
            beta = None,
            alpha_param = None,
            beta_param = None,
            u = None,
            v = None,
            method = None,
            adaptive = false,
        ),
        text_signature = "(alpha='identity', beta='identity', /, alpha_param=None, \
                          beta_param=None, u=None, v=None, method='central', adaptive=False)"
    )]
    pub fn new<'py>(
        alpha: Option<&str>, beta: Option<&str>, alpha_param: Option<f64>,
        beta_param: Option<f64>, u: Option<&Bound<'py, PyAny>>, v: Option<&Bound<'py, PyAny>>,
        method: Option<&str>, adaptive: bool,
    ) -> PyResult<Self> {
        Ok(Derivative {
            alpha: extract_generator(alpha, alpha_param)?,
            beta: extract_generator(beta, beta_param)?,
            u: extract_weight(u),
            v: extract_weight(v),
            method: extract_fd_method(method)?,
            adaptive,
        })
    }

    #[pyo3(
        signature = (f, points, dx = None),
        text_signature = "(self, f, points, /, dx=None)"
    )]
    pub fn differentiate<'py>(
        &self, py: Python<'py>, f: &Bound<'py, PyAny>, points: &Bound<'py, PyAny>,
        dx: Option<f64>,
    ) -> PyResult<Vec<f64>> {
        let arr: PyReadonlyArray1<f64> = extract_f64_array(py, points)?;
        let pts = Array1::from(
            arr.as_slice()
                .map_err(|_| {
                    PyValueError::new_err(
                        "points must be a 1-D contiguous float64 array or sequence",
                    )
                })?
                .to_vec(),
        );
        let g = scalar_callable(f);

        let op = UnifiedDerivative::new(
            self.alpha.clone(),
            self.beta.clone(),
            self.u.clone(),
            self.v.clone(),
            self.method,
        );
        let out = if self.adaptive {
            AdaptiveMetaDerivative::new(op).differentiate(g, &pts, dx)
        } else {
            op.differentiate(g, &pts, dx)
        };
        out.map(|v| v.to_vec()).map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

/// Integral — Python-facing meta-integral operator.
///
/// Purpose
/// -------
/// Expose weighted generator-measure integration to Python: the value
/// with fallback provenance, plus the measure-weighted mean and
/// variance.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "meta_calculus.operators")]
pub struct Integral {
    alpha: AnyGenerator,
    beta: AnyGenerator,
    weight: Option<WeightFn>,
    n_points: usize,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Integral {
    #[new]
    #[pyo3(
        signature = (
            alpha = None,
            beta = None,
            alpha_param = None,
            beta_param = None,
            weight = None,
            n_points = None,
        ),
        text_signature = "(alpha='identity', beta='identity', /, alpha_param=None, \
                          beta_param=None, weight=None, n_points=101)"
    )]
    pub fn new<'py>(
        alpha: Option<&str>, beta: Option<&str>, alpha_param: Option<f64>,
        beta_param: Option<f64>, weight: Option<&Bound<'py, PyAny>>, n_points: Option<usize>,
    ) -> PyResult<Self> {
        let n_points = n_points.unwrap_or(DEFAULT_N_POINTS);
        if n_points < 3 {
            return Err(PyValueError::new_err("n_points must be at least 3"));
        }
        Ok(Integral {
            alpha: extract_generator(alpha, alpha_param)?,
            beta: extract_generator(beta, beta_param)?,
            weight: extract_weight(weight),
            n_points,
        })
    }

    // Build the core operator per call; it is configuration-only.
    fn core(&self) -> PyResult<MetaIntegral<AnyGenerator, AnyGenerator>> {
        MetaIntegral::with_options(
            self.alpha.clone(),
            self.beta.clone(),
            self.weight.clone(),
            self.n_points,
        )
        .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[pyo3(
        signature = (f, a, b, method = None),
        text_signature = "(self, f, a, b, /, method='adaptive')"
    )]
    pub fn integrate<'py>(
        &self, f: &Bound<'py, PyAny>, a: f64, b: f64, method: Option<&str>,
    ) -> PyResult<IntegralResult> {
        let method = extract_quadrature_method(method)?;
        let out = self
            .core()?
            .integrate(scalar_callable(f), a, b, method)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(IntegralResult { inner: out })
    }

    #[pyo3(signature = (f, a, b), text_signature = "(self, f, a, b, /)")]
    pub fn mean_value<'py>(&self, f: &Bound<'py, PyAny>, a: f64, b: f64) -> PyResult<f64> {
        self.core()?
            .mean_value(scalar_callable(f), a, b)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[pyo3(signature = (f, a, b), text_signature = "(self, f, a, b, /)")]
    pub fn variance<'py>(&self, f: &Bound<'py, PyAny>, a: f64, b: f64) -> PyResult<f64> {
        self.core()?
            .variance(scalar_callable(f), a, b)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

/// IntegralResult — quadrature value with fallback provenance.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "meta_calculus.operators")]
pub struct IntegralResult {
    inner: crate::operators::integration::IntegralOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl IntegralResult {
    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn method_used(&self) -> String {
        format!("{:?}", self.inner.method_used).to_lowercase()
    }

    #[getter]
    pub fn fallback_taken(&self) -> bool {
        self.inner.fallback_taken
    }

    #[getter]
    pub fn error_estimate(&self) -> Option<f64> {
        self.inner.error_estimate
    }
}

/// StraightLineTest — linearization verdict for a generator pair.
///
/// Purpose
/// -------
/// Run the straight-line test from Python: sample a callable over a
/// range, regress `β(f(x))` on `α(x)`, and expose slope, intercept,
/// `R²`, the slope p-value, and the verdict as read-only properties.
/// The test runs in the constructor, so a constructed instance always
/// holds a complete outcome.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "meta_calculus.operators")]
pub struct StraightLineTest {
    inner: LinearizationOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl StraightLineTest {
    #[new]
    #[pyo3(
        signature = (f, lo, hi, alpha = None, beta = None, alpha_param = None, beta_param = None, n_points = None),
        text_signature = "(f, lo, hi, /, alpha='identity', beta='identity', \
                          alpha_param=None, beta_param=None, n_points=101)"
    )]
    pub fn new<'py>(
        f: &Bound<'py, PyAny>, lo: f64, hi: f64, alpha: Option<&str>, beta: Option<&str>,
        alpha_param: Option<f64>, beta_param: Option<f64>, n_points: Option<usize>,
    ) -> PyResult<Self> {
        let alpha = extract_generator(alpha, alpha_param)?;
        let beta = extract_generator(beta, beta_param)?;
        let inner = straight_line_test(
            scalar_callable(f),
            &alpha,
            &beta,
            (lo, hi),
            n_points.unwrap_or(DEFAULT_N_POINTS),
        )
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(StraightLineTest { inner })
    }

    #[getter]
    pub fn slope(&self) -> f64 {
        self.inner.slope
    }

    #[getter]
    pub fn intercept(&self) -> f64 {
        self.inner.intercept
    }

    #[getter]
    pub fn r_squared(&self) -> f64 {
        self.inner.r_squared
    }

    #[getter]
    pub fn p_value(&self) -> f64 {
        self.inner.p_value
    }

    #[getter]
    pub fn is_linear(&self) -> bool {
        self.inner.is_linear
    }
}

/// BlackHole — Python-facing Hawking evaporation problem.
///
/// Purpose
/// -------
/// Expose [`BlackHoleEvolution`] to Python: closed-form temperature,
/// mass-loss, horizon, and bigeometric-derivative queries, plus the
/// entropy-factor evolution with its fallback provenance.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "meta_calculus.applications")]
pub struct BlackHole {
    inner: BlackHoleEvolution,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BlackHole {
    #[new]
    #[pyo3(
        signature = (initial_mass, units = None),
        text_signature = "(initial_mass, /, units='planck')"
    )]
    pub fn new(initial_mass: f64, units: Option<&str>) -> PyResult<Self> {
        use std::str::FromStr;

        let units = match units {
            Some(s) => {
                UnitSystem::from_str(s).map_err(|e| PyValueError::new_err(e.to_string()))?
            }
            None => UnitSystem::Planck,
        };
        let inner = BlackHoleEvolution::new(initial_mass, units, IvpOptions::default())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(BlackHole { inner })
    }

    pub fn hawking_temperature(&self, m: f64) -> f64 {
        self.inner.hawking_temperature(m)
    }

    pub fn mass_loss_rate(&self, m: f64) -> f64 {
        self.inner.mass_loss_rate(m)
    }

    pub fn horizon_radius(&self, m: f64) -> f64 {
        self.inner.horizon_radius(m)
    }

    pub fn bigeometric_temperature_derivative(&self, m: f64) -> f64 {
        self.inner.bigeometric_temperature_derivative(m)
    }

    #[pyo3(text_signature = "(self, t_end, /)")]
    pub fn evolve(&self, t_end: f64) -> PyResult<Evolution> {
        let outcome =
            self.inner.evolve(t_end).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let drift = self.inner.conservation_check(&outcome);
        Ok(Evolution { inner: outcome, conservation_drift: drift })
    }
}

/// Evolution — mass and entropy-factor trajectory for Python callers.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "meta_calculus.applications")]
pub struct Evolution {
    inner: crate::applications::blackhole::EvolutionOutcome,
    conservation_drift: f64,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Evolution {
    #[getter]
    pub fn time(&self) -> Vec<f64> {
        self.inner.time.clone()
    }

    #[getter]
    pub fn mass(&self) -> Vec<f64> {
        self.inner.mass.clone()
    }

    #[getter]
    pub fn horizon_factor(&self) -> Vec<f64> {
        self.inner.horizon_factor.clone()
    }

    #[getter]
    pub fn radiation_factor(&self) -> Vec<f64> {
        self.inner.radiation_factor.clone()
    }

    #[getter]
    pub fn information_factor(&self) -> Vec<f64> {
        self.inner.information_factor.clone()
    }

    #[getter]
    pub fn fallback_taken(&self) -> bool {
        self.inner.fallback_taken
    }

    #[getter]
    pub fn conservation_drift(&self) -> f64 {
        self.conservation_drift
    }
}

/// _meta_calculus — PyO3 module initializer for the Python extension.
///
/// Creates the `operators` and `applications` submodules, attaches them
/// to the parent module, and registers them in `sys.modules` so dotted
/// imports work from Python.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _meta_calculus<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let operators_mod = PyModule::new(_py, "operators")?;
    let applications_mod = PyModule::new(_py, "applications")?;
    operators_submodule(_py, m, &operators_mod)?;
    applications_submodule(_py, m, &applications_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("meta_calculus.operators", operators_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("meta_calculus.applications", applications_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn operators_submodule<'py>(
    _py: Python, meta_calculus: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Derivative>()?;
    m.add_class::<Integral>()?;
    m.add_class::<IntegralResult>()?;
    m.add_class::<StraightLineTest>()?;
    meta_calculus.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn applications_submodule<'py>(
    _py: Python, meta_calculus: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<BlackHole>()?;
    m.add_class::<Evolution>()?;
    meta_calculus.add_submodule(m)?;
    Ok(())
}
