use super::*;

/// Global parameters of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayParams {
    /// Minimum distance a ray travels between two hits.
    ///
    /// See [`SimulationCtx::new`] for more info on the role of this field.
    pub epsilon: Float,
    /// Maximum number of steps before a ray is forcefully terminated.
    pub iteration_cap: usize,
    /// Also ignore the object that was hit last, during the step right after
    /// the hit. Breaks rays trapped inside concave or closed reflectors.
    pub exclude_last_hit: bool,
    /// Terminate rays that start repeating a previous segment, using
    /// the given tolerance for comparisons.
    pub loop_detection: Option<Float>,
}

impl RayParams {
    pub const DEFAULT_EPSILON: Float = 1e-6;
    pub const DEFAULT_ITERATION_CAP: usize = 1000;

    /// `self` with another [`Self::epsilon`]. A negative one would let rays hit
    /// things behind them.
    #[inline]
    pub fn try_with_epsilon(self, epsilon: Float) -> Result<Self, GeometryError> {
        if !(epsilon.is_finite() && epsilon >= 0.) {
            return Err(GeometryError::InvalidEpsilon(epsilon));
        }

        Ok(Self { epsilon, ..self })
    }

    #[inline]
    #[must_use]
    pub fn ctx(&self) -> SimulationCtx {
        SimulationCtx::new(self.epsilon)
    }
}

impl Default for RayParams {
    fn default() -> Self {
        Self {
            epsilon: Self::DEFAULT_EPSILON,
            iteration_cap: Self::DEFAULT_ITERATION_CAP,
            exclude_last_hit: false,
            loop_detection: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilons_must_be_non_negative() {
        let params = RayParams::default().try_with_epsilon(0.5).unwrap();
        assert_eq!(params.epsilon, 0.5);
        assert_eq!(params.iteration_cap, RayParams::DEFAULT_ITERATION_CAP);

        assert!(RayParams::default().try_with_epsilon(0.).is_ok());

        for bad in [-1e-6, Float::NAN, Float::INFINITY] {
            assert!(matches!(
                RayParams::default().try_with_epsilon(bad),
                Err(GeometryError::InvalidEpsilon(_))
            ));
        }
    }
}
