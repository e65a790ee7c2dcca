use super::*;

use log::{trace, warn};

/// An iterator stepping a [`Ray`] through a scene, yielding every segment it travels.
///
/// Each step finds the closest hit among the objects of `mirror`, moves the ray there
/// and lets the hit object alter the ray's direction, or absorb it.
pub struct RayPath<'a, M: ?Sized> {
    ray: Ray,
    mirror: &'a M,
    params: RayParams,
    last_hit: Option<usize>,
    excluded: Option<usize>,
}

impl<'a, M: Deflector + ?Sized> RayPath<'a, M> {
    #[inline]
    #[must_use]
    pub fn new(mirror: &'a M, ray: Ray, params: RayParams) -> Self {
        Self {
            ray,
            mirror,
            params,
            last_hit: None,
            excluded: None,
        }
    }

    /// Ignore the top-level object at `index` during the first step,
    /// e. g. the object the ray is emitted from.
    #[inline]
    #[must_use]
    pub fn excluding(self, index: Option<usize>) -> Self {
        Self {
            excluded: index,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    #[inline]
    #[must_use]
    pub fn into_ray(self) -> Ray {
        self.ray
    }

    fn ctx(&mut self) -> SimulationCtx {
        let skip = self.excluded.take().or(if self.params.exclude_last_hit {
            self.last_hit
        } else {
            None
        });

        self.params.ctx().skipping(skip)
    }

    fn step(&mut self) -> Option<Line> {
        if self.ray.is_terminated() {
            return None;
        }

        if self.ray.iteration_count() >= self.params.iteration_cap {
            warn!(
                "ray starting at {:?} hit the iteration cap ({}), terminating it",
                self.ray.start(),
                self.params.iteration_cap,
            );
            self.ray.terminate(Termination::IterationCap);
            return None;
        }

        let ctx = self.ctx();

        let Some(hit) = self.mirror.closest_hit(&self.ray, ctx) else {
            trace!("ray escaped after {} steps", self.ray.iteration_count());
            self.ray.terminate(Termination::Escaped);
            return None;
        };

        let segment = self.ray.bounce(&hit);
        self.last_hit = hit.index;

        if let (Some(eps), Some((last, previous))) =
            (self.params.loop_detection, self.ray.path().split_last())
        {
            if loop_index(previous, last, eps).is_some() {
                trace!("ray entered a loop after {} steps", self.ray.iteration_count());
                self.ray.terminate(Termination::Loop);
            }
        }

        if let Some(reason) = self.ray.termination() {
            trace!("ray terminated ({reason:?}) after {} steps", self.ray.iteration_count());
        }

        Some(segment)
    }
}

impl<M: Deflector + ?Sized> Iterator for RayPath<'_, M> {
    type Item = Line;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

/// Checks whether appending `new_segment` to `path` makes the ray repeat itself:
/// returns the index of the segment of `path` it duplicates, if any.
///
/// `eps` is used for comparisons.
#[inline]
#[must_use]
pub fn loop_index(path: &[Line], new_segment: &Line, eps: Float) -> Option<usize> {
    path.iter().position(|segment| {
        (segment.start - new_segment.start).norm() <= eps
            && (segment.end - new_segment.end).norm() <= eps
    })
}
