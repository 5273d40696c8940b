use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{Color, Schedule, SimConfig, Simulation};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around the Rust simulation core.
///
/// API:
/// - __new__(box_size=1.0, seed=None, schedule="phased")
/// - step(), step_n(n)
/// - place(count, radius, color) -> bool
/// - seed_air_mix() -> bool
/// - clear_all()
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 3)
/// - get_radii() -> np.ndarray, shape (N,)
/// - get_colors() -> list[str]
#[pyclass]
pub struct GasBox {
    sim: Simulation,
}

#[pymethods]
impl GasBox {
    /// Create an empty box.
    ///
    /// Parameters
    /// - box_size: side length of the cube, centred on the origin (float, > 0)
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    /// - schedule: "phased" or "interleaved"
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (box_size=1.0, seed=None, schedule="phased"))]
    fn new(box_size: f64, seed: Option<u64>, schedule: &str) -> PyResult<Self> {
        let schedule: Schedule = schedule.parse().map_err(py_err)?;
        let mut config = SimConfig::new(box_size).with_schedule(schedule);
        config.seed = seed;
        let sim = Simulation::new(config).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Advance one tick.
    fn step(&mut self) {
        self.sim.step();
    }

    /// Advance `n` ticks (releases the GIL during computation).
    fn step_n(&mut self, py: Python<'_>, n: u64) {
        let sim = &mut self.sim;
        py.detach(|| {
            for _ in 0..n {
                sim.step();
            }
        });
    }

    /// Place `count` non-overlapping particles; all or nothing.
    ///
    /// Errors: raises ValueError on an unknown color name.
    fn place(&mut self, count: usize, radius: f64, color: &str) -> PyResult<bool> {
        let color: Color = color.parse().map_err(py_err)?;
        Ok(self.sim.place(count, radius, color))
    }

    /// Place the start-up air mix (78 cyan, 21 red, 1 yellow).
    fn seed_air_mix(&mut self) -> bool {
        self.sim.seed_air_mix()
    }

    fn clear_all(&mut self) {
        self.sim.clear_all();
    }

    /// Return positions as a NumPy array of shape (N, 3), dtype=float64.
    fn get_positions(&self, py: Python<'_>) -> Py<PyArray2<f64>> {
        rows(py, self.sim.positions().iter().map(|p| p.to_array()))
    }

    /// Return velocities as a NumPy array of shape (N, 3), dtype=float64.
    fn get_velocities(&self, py: Python<'_>) -> Py<PyArray2<f64>> {
        rows(py, self.sim.velocities().iter().map(|v| v.to_array()))
    }

    /// Return radii as a NumPy array of shape (N,), dtype=float64.
    fn get_radii(&self, py: Python<'_>) -> Py<PyArray1<f64>> {
        let radii: Array1<f64> = self.sim.views().map(|v| v.radius).collect();
        radii.into_pyarray(py).unbind()
    }

    /// Return color names in particle order.
    fn get_colors(&self) -> Vec<&'static str> {
        self.sim.views().map(|v| v.tag.name()).collect()
    }

    /// Number of completed ticks.
    fn tick(&self) -> u64 {
        self.sim.tick()
    }

    fn __len__(&self) -> usize {
        self.sim.len()
    }
}

fn rows<I>(py: Python<'_>, data: I) -> Py<PyArray2<f64>>
where
    I: ExactSizeIterator<Item = [f64; 3]>,
{
    let mut arr = Array2::<f64>::zeros((data.len(), 3));
    for (i, row) in data.enumerate() {
        for (k, value) in row.into_iter().enumerate() {
            arr[[i, k]] = value;
        }
    }
    arr.into_pyarray(py).unbind()
}

/// The gasbox Python module entry point.
#[pymodule]
fn gasbox(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<GasBox>()?;
    Ok(())
}
