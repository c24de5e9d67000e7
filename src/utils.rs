#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    calculus::generators::AnyGenerator,
    operators::{derivatives::FdMethod, integration::QuadratureMethod},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

#[cfg(feature = "python-bindings")]
pub fn extract_generator(name: Option<&str>, param: Option<f64>) -> PyResult<AnyGenerator> {
    use crate::calculus::errors::CalcError;

    let name = name.unwrap_or("identity");
    AnyGenerator::from_name(name, param).map_err(|e: CalcError| PyValueError::new_err(e.to_string()))
}

#[cfg(feature = "python-bindings")]
pub fn extract_fd_method(name: Option<&str>) -> PyResult<FdMethod> {
    use std::str::FromStr;

    match name {
        Some(s) => FdMethod::from_str(s).map_err(|e| PyValueError::new_err(e.to_string())),
        None => Ok(FdMethod::Central),
    }
}

#[cfg(feature = "python-bindings")]
pub fn extract_quadrature_method(name: Option<&str>) -> PyResult<QuadratureMethod> {
    use std::str::FromStr;

    match name {
        Some(s) => {
            QuadratureMethod::from_str(s).map_err(|e| PyValueError::new_err(e.to_string()))
        }
        None => Ok(QuadratureMethod::Adaptive),
    }
}

/// Wrap a Python callable as a scalar `f64 → f64` closure.
///
/// The operator layer's substitution contract has no channel for a
/// raised Python exception mid-quadrature, so a failing call maps to
/// NaN and surfaces through the operators' non-finite checks.
#[cfg(feature = "python-bindings")]
pub fn scalar_callable<'py>(f: &Bound<'py, PyAny>) -> impl Fn(f64) -> f64 + '_ {
    move |x: f64| {
        f.call1((x,))
            .and_then(|v| v.extract::<f64>())
            .unwrap_or(f64::NAN)
    }
}
