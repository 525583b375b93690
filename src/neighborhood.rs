//! Neighborhood offset sets
//!
//! A [`Neighborhood`] is the list of relative offsets the builder tries from
//! every cell. Two population policies are supported and must be chosen up
//! front:
//!
//! - [`OffsetPolicy::Ordered`]: registration order kept, duplicates kept. A
//!   duplicated offset yields a second (parallel) edge in a directed build.
//! - [`OffsetPolicy::Deduplicated`]: set semantics, a repeated offset is
//!   dropped; first-registration order is kept.
//!
//! Mirror-image offsets (`o` and `-o`) are distinct under both policies. In
//! an undirected build the second one finds the edge already present and adds
//! nothing; in a directed build each yields its own arc.

use crate::error::{Error, Result};
use crate::grid::{displace, Index, Offset};
use std::collections::HashSet;

/// How repeated offsets are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OffsetPolicy {
    /// Keep registration order and duplicates
    #[default]
    Ordered,
    /// Drop offsets already registered
    Deduplicated,
}

/// Relative offsets plus their bounding radius
///
/// # Example
///
/// ```
/// use grid_graph::{Neighborhood, OffsetPolicy};
///
/// let mut hood = Neighborhood::<2>::deduplicated();
/// assert!(hood.add([-1, 0]).unwrap());
/// assert!(hood.add([2, 0]).unwrap());
/// assert!(!hood.add([-1, 0]).unwrap()); // already present
/// assert!(hood.add([0, 0]).is_err());   // zero offset rejected
///
/// assert_eq!(hood.len(), 2);
/// assert_eq!(hood.radius(), [2, 0]);
/// assert_eq!(hood.policy(), OffsetPolicy::Deduplicated);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood<const D: usize> {
    policy: OffsetPolicy,
    offsets: Vec<Offset<D>>,
    seen: HashSet<Offset<D>>,
    radius: [u64; D],
}

impl<const D: usize> Neighborhood<D> {
    /// Empty neighborhood with the given policy
    #[must_use]
    pub fn new(policy: OffsetPolicy) -> Self {
        Self {
            policy,
            offsets: Vec::new(),
            seen: HashSet::new(),
            radius: [0; D],
        }
    }

    /// Empty order-preserving neighborhood (duplicates kept)
    #[must_use]
    pub fn ordered() -> Self {
        Self::new(OffsetPolicy::Ordered)
    }

    /// Empty deduplicating neighborhood
    #[must_use]
    pub fn deduplicated() -> Self {
        Self::new(OffsetPolicy::Deduplicated)
    }

    /// Neighborhood populated from `offsets`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroOffset`] if any offset is all zeros.
    pub fn from_offsets<I>(policy: OffsetPolicy, offsets: I) -> Result<Self>
    where
        I: IntoIterator<Item = Offset<D>>,
    {
        let mut hood = Self::new(policy);
        hood.extend(offsets)?;
        Ok(hood)
    }

    /// Face neighbors: `±1` along each axis (4-connectivity in 2D, 6 in 3D)
    #[must_use]
    pub fn von_neumann(policy: OffsetPolicy) -> Self {
        let mut hood = Self::new(policy);
        for axis in 0..D {
            for step in [-1, 1] {
                let mut offset = [0; D];
                offset[axis] = step;
                hood.push(offset);
            }
        }
        hood
    }

    /// Every offset in `{-1, 0, 1}^D` except zero (8-connectivity in 2D, 26 in 3D)
    ///
    /// Offsets are enumerated with axis 0 varying fastest, starting from
    /// `[-1; D]`. The set has `3^D - 1` members.
    #[must_use]
    pub fn moore(policy: OffsetPolicy) -> Self {
        let mut hood = Self::new(policy);
        let mut offset = [-1_i64; D];
        loop {
            if offset.iter().any(|&c| c != 0) {
                hood.push(offset);
            }
            let mut axis = 0;
            loop {
                if axis == D {
                    return hood;
                }
                if offset[axis] < 1 {
                    offset[axis] += 1;
                    break;
                }
                offset[axis] = -1;
                axis += 1;
            }
        }
    }

    /// One positive unit vector per axis
    ///
    /// Reaches every face-adjacent pair exactly once, so an undirected build
    /// never hits the existence check.
    #[must_use]
    pub fn forward(policy: OffsetPolicy) -> Self {
        let mut hood = Self::new(policy);
        for axis in 0..D {
            let mut offset = [0; D];
            offset[axis] = 1;
            hood.push(offset);
        }
        hood
    }

    /// `-1` then `+1` along a single axis (a row-wise chain when `axis == 0`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `axis >= D`.
    pub fn along_axis(axis: usize, policy: OffsetPolicy) -> Result<Self> {
        if axis >= D {
            return Err(Error::InvalidParameter {
                name: "axis",
                reason: format!("{axis} is not an axis of a {D}-dimensional grid"),
            });
        }
        let mut hood = Self::new(policy);
        for step in [-1, 1] {
            let mut offset = [0; D];
            offset[axis] = step;
            hood.push(offset);
        }
        Ok(hood)
    }

    /// Register `offset`
    ///
    /// Returns `false` when the deduplicating policy dropped an offset that
    /// was already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroOffset`] for the all-zero offset.
    pub fn add(&mut self, offset: Offset<D>) -> Result<bool> {
        if offset.iter().all(|&c| c == 0) {
            return Err(Error::ZeroOffset);
        }
        Ok(self.push(offset))
    }

    /// Register every offset in `offsets`, stopping at the first zero offset
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroOffset`] if any offset is all zeros; offsets
    /// before it stay registered.
    pub fn extend<I>(&mut self, offsets: I) -> Result<()>
    where
        I: IntoIterator<Item = Offset<D>>,
    {
        for offset in offsets {
            self.add(offset)?;
        }
        Ok(())
    }

    fn push(&mut self, offset: Offset<D>) -> bool {
        let fresh = self.seen.insert(offset);
        if self.policy == OffsetPolicy::Deduplicated && !fresh {
            return false;
        }
        for (r, c) in self.radius.iter_mut().zip(&offset) {
            *r = (*r).max(c.unsigned_abs());
        }
        self.offsets.push(offset);
        true
    }

    /// Registered offsets in registration order
    #[must_use]
    pub fn offsets(&self) -> &[Offset<D>] {
        &self.offsets
    }

    /// Number of registered offsets (duplicates included under `Ordered`)
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether no offset is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Population policy
    #[must_use]
    pub const fn policy(&self) -> OffsetPolicy {
        self.policy
    }

    /// Componentwise max of `|offset[axis]|`; zero when empty
    #[must_use]
    pub const fn radius(&self) -> [u64; D] {
        self.radius
    }

    /// Whether the mirror `-o` of every registered `o` is registered too
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.offsets.iter().all(|offset| {
            let mut mirror = [0; D];
            for (m, c) in mirror.iter_mut().zip(offset) {
                match c.checked_neg() {
                    Some(neg) => *m = neg,
                    None => return false,
                }
            }
            self.seen.contains(&mirror)
        })
    }

    /// `(offset, center + offset)` for every registered offset
    ///
    /// No bounds check is made. The neighbor is `None` when the addition
    /// overflows `i64`.
    pub fn neighbors<'a>(
        &'a self,
        center: &'a Index<D>,
    ) -> impl Iterator<Item = (Offset<D>, Option<Index<D>>)> + 'a {
        self.offsets
            .iter()
            .map(move |offset| (*offset, displace(center, offset)))
    }
}

impl<const D: usize> Default for Neighborhood<D> {
    fn default() -> Self {
        Self::ordered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_offset_rejected() {
        let mut hood = Neighborhood::<3>::ordered();
        assert_eq!(hood.add([0, 0, 0]), Err(Error::ZeroOffset));
        assert!(hood.is_empty());
    }

    #[test]
    fn test_ordered_keeps_duplicates() {
        let hood =
            Neighborhood::from_offsets(OffsetPolicy::Ordered, [[1, 0], [0, 1], [1, 0]]).unwrap();
        assert_eq!(hood.offsets(), &[[1, 0], [0, 1], [1, 0]]);
    }

    #[test]
    fn test_deduplicated_keeps_first_order() {
        let hood = Neighborhood::from_offsets(
            OffsetPolicy::Deduplicated,
            [[0, 1], [1, 0], [0, 1], [-1, 0]],
        )
        .unwrap();
        assert_eq!(hood.offsets(), &[[0, 1], [1, 0], [-1, 0]]);
    }

    #[test]
    fn test_mirrors_are_distinct_offsets() {
        let hood =
            Neighborhood::from_offsets(OffsetPolicy::Deduplicated, [[1, 0], [-1, 0]]).unwrap();
        assert_eq!(hood.len(), 2);
    }

    #[test]
    fn test_radius_componentwise_max() {
        let hood =
            Neighborhood::from_offsets(OffsetPolicy::Ordered, [[-3, 1], [2, -2], [0, 1]]).unwrap();
        assert_eq!(hood.radius(), [3, 2]);
        assert_eq!(Neighborhood::<2>::ordered().radius(), [0, 0]);
    }

    #[test]
    fn test_extend_stops_at_zero() {
        let mut hood = Neighborhood::<2>::ordered();
        let err = hood.extend([[1, 0], [0, 0], [0, 1]]).unwrap_err();
        assert_eq!(err, Error::ZeroOffset);
        assert_eq!(hood.offsets(), &[[1, 0]]);
    }

    #[test]
    fn test_presets() {
        let four = Neighborhood::<2>::von_neumann(OffsetPolicy::Ordered);
        assert_eq!(four.offsets(), &[[-1, 0], [1, 0], [0, -1], [0, 1]]);
        assert!(four.is_symmetric());

        let eight = Neighborhood::<2>::moore(OffsetPolicy::Ordered);
        assert_eq!(eight.len(), 8);
        assert!(eight.is_symmetric());
        assert_eq!(eight.radius(), [1, 1]);

        let twenty_six = Neighborhood::<3>::moore(OffsetPolicy::Deduplicated);
        assert_eq!(twenty_six.len(), 26);

        let forward = Neighborhood::<3>::forward(OffsetPolicy::Ordered);
        assert_eq!(forward.offsets(), &[[1, 0, 0], [0, 1, 0], [0, 0, 1]]);
        assert!(!forward.is_symmetric());
    }

    #[test]
    fn test_moore_higher_dimensions() {
        let hood = Neighborhood::<4>::moore(OffsetPolicy::Deduplicated);
        assert_eq!(hood.len(), 80);
        assert_eq!(hood.offsets()[0], [-1, -1, -1, -1]);
        assert_eq!(hood.offsets()[1], [0, -1, -1, -1]);
        assert_eq!(hood.offsets()[79], [1, 1, 1, 1]);
        assert!(hood.is_symmetric());

        assert!(Neighborhood::<0>::moore(OffsetPolicy::Ordered).is_empty());
        assert_eq!(Neighborhood::<1>::moore(OffsetPolicy::Ordered).offsets(), &[[-1], [1]]);
    }

    #[test]
    fn test_along_axis() {
        let rows = Neighborhood::<2>::along_axis(0, OffsetPolicy::Ordered).unwrap();
        assert_eq!(rows.offsets(), &[[-1, 0], [1, 0]]);
        assert_eq!(rows.radius(), [1, 0]);

        let err = Neighborhood::<2>::along_axis(2, OffsetPolicy::Ordered).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "axis", .. }));
    }

    #[test]
    fn test_neighbors_no_bounds_check() {
        let hood =
            Neighborhood::from_offsets(OffsetPolicy::Ordered, [[-1, 0], [1, 0], [0, 5]]).unwrap();
        let center = [0, 0];
        let found: Vec<_> = hood.neighbors(&center).collect();
        assert_eq!(
            found,
            vec![
                ([-1, 0], Some([-1, 0])),
                ([1, 0], Some([1, 0])),
                ([0, 5], Some([0, 5])),
            ]
        );
    }

    #[test]
    fn test_neighbors_overflow_is_none() {
        let hood = Neighborhood::from_offsets(OffsetPolicy::Ordered, [[1]]).unwrap();
        let center = [i64::MAX];
        let found: Vec<_> = hood.neighbors(&center).collect();
        assert_eq!(found, vec![([1], None)]);
    }
}
