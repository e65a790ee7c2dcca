use super::*;

use either::Either;
use std::{rc::Rc, sync::Arc};

/// How an object reacts to being hit by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Deflection {
    /// Specular reflection about the surface with the given normal.
    ///
    /// The orientation of the normal is irrelevant.
    Reflect(Dir2),
    /// The ray leaves in the given direction, regardless of where it came from.
    Redirect(Dir2),
    /// The ray is absorbed.
    Terminate,
}

impl Deflection {
    /// The direction a ray traveling along `dir` leaves in, or `None` if it is absorbed.
    #[inline]
    #[must_use]
    pub fn apply(&self, dir: &Dir2) -> Option<Dir2> {
        match self {
            Self::Reflect(normal) => {
                let n = normal.as_ref();
                let d = dir.as_ref();
                // orthogonal symmetries preserve norms
                Some(Dir2::new_unchecked(d - n * (2. * d.dot(n))))
            }
            Self::Redirect(new_dir) => Some(*new_dir),
            Self::Terminate => None,
        }
    }
}

/// An intersection between a ray and a [`Deflector`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Distance travelled by the ray before hitting.
    pub dist: Float,
    pub deflection: Deflection,
    /// Index of the top-level object of the scene that was hit, when the scene is a collection.
    pub index: Option<usize>,
}

impl Hit {
    #[inline]
    #[must_use]
    pub fn new(dist: Float, deflection: Deflection) -> Self {
        Self {
            dist,
            deflection,
            index: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_index(self, index: usize) -> Self {
        Self {
            index: Some(index),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn map_deflection(self, f: impl FnOnce(Deflection) -> Deflection) -> Self {
        Self {
            deflection: f(self.deflection),
            ..self
        }
    }
}

/// Parameters of a single propagation step, handed down to every [`Deflector`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationCtx {
    eps: Float,
    skip: Option<usize>,
}

impl SimulationCtx {
    /// `eps` must be positive and large enough to absorb the roundoff errors
    /// of [`Float`], but small enough not to swallow legitimate hits.
    #[inline]
    #[must_use]
    pub fn new(eps: Float) -> Self {
        Self { eps, skip: None }
    }

    /// Also ignore the top-level object at `index` during this step.
    #[inline]
    #[must_use]
    pub fn skipping(self, index: Option<usize>) -> Self {
        Self { skip: index, ..self }
    }

    #[inline]
    #[must_use]
    pub fn eps(&self) -> Float {
        self.eps
    }

    #[inline]
    #[must_use]
    pub fn skipped(&self) -> Option<usize> {
        self.skip
    }

    /// The context seen by the elements of a collection: skipping only applies to top-level objects.
    #[inline]
    #[must_use]
    pub fn nested(self) -> Self {
        Self { skip: None, ..self }
    }

    /// Returns the hit with the smallest distance greater than `eps`.
    ///
    /// Hits at or behind the ray's origin, or so close to it that they are
    /// most likely the surface the ray just left, are discarded.
    #[inline]
    #[must_use]
    pub fn closest(&self, hits: impl IntoIterator<Item = Hit>) -> Option<Hit> {
        hits.into_iter()
            .filter(|hit| hit.dist.is_finite() && hit.dist > self.eps)
            .min_by(|h1, h2| h1.dist.total_cmp(&h2.dist))
    }
}

/// The core trait of this library: an object rays can bump into.
///
/// Implementors report the closest point where `ray` hits them (through
/// [`SimulationCtx::closest`]) and how they alter the ray there.
///
/// This method must be deterministic: for some `ray`, it always has
/// the same result, regardless of external state.
pub trait Deflector {
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit>;
}

impl<L: Deflector, R: Deflector> Deflector for Either<L, R> {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        match self {
            Either::Left(m) => m.closest_hit(ray, ctx),
            Either::Right(m) => m.closest_hit(ray, ctx),
        }
    }
}

impl<L: Deflector, R: Deflector> Deflector for (L, R) {
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        let (l, r) = self;
        let inner = ctx.nested();

        let left = (ctx.skipped() != Some(0))
            .then(|| l.closest_hit(ray, inner).map(|h| h.with_index(0)))
            .flatten();

        let right = (ctx.skipped() != Some(1))
            .then(|| r.closest_hit(ray, inner).map(|h| h.with_index(1)))
            .flatten();

        ctx.closest(left.into_iter().chain(right))
    }
}

impl<T: Deflector> Deflector for [T] {
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        let inner = ctx.nested();

        ctx.closest(
            self.iter()
                .enumerate()
                .filter(|(i, _)| ctx.skipped() != Some(*i))
                .filter_map(|(i, m)| m.closest_hit(ray, inner).map(|h| h.with_index(i))),
        )
    }
}

impl<T: Deflector, const N: usize> Deflector for [T; N] {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        self.as_slice().closest_hit(ray, ctx)
    }
}

impl<T: Deflector> Deflector for Vec<T> {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        self.as_slice().closest_hit(ray, ctx)
    }
}

// All of these go through `Deref`, but a blanket impl over `Deref` would
// make implementing `Deflector` for new types downstream impossible.

impl<T: Deflector + ?Sized> Deflector for Box<T> {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        self.as_ref().closest_hit(ray, ctx)
    }
}

impl<T: Deflector + ?Sized> Deflector for Rc<T> {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        self.as_ref().closest_hit(ray, ctx)
    }
}

impl<T: Deflector + ?Sized> Deflector for Arc<T> {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        self.as_ref().closest_hit(ray, ctx)
    }
}

impl<T: Deflector + ?Sized> Deflector for &T {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        (**self).closest_hit(ray, ctx)
    }
}

impl<T: Deflector + ?Sized> Deflector for &mut T {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        (**self).closest_hit(ray, ctx)
    }
}
