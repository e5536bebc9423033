use std::borrow::Cow;

use indexmap::map::{Iter, IterMut};
use indexmap::IndexMap;
use log::warn;

use super::array::DataArray;
use super::encodings::{ArrayRetrievalError, ArrayType};
use super::traits::ByteArrayView;

/// A collection of [`DataArray`] keyed by [`ArrayType`]. Every array is expected to be
/// index-aligned with the m/z array, so any subsetting or reordering is applied to all
/// arrays in lock-step.
///
/// Arrays are kept in insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryArrayMap {
    pub byte_buffer_map: IndexMap<ArrayType, DataArray>,
}

impl BinaryArrayMap {
    pub fn new() -> BinaryArrayMap {
        BinaryArrayMap {
            ..Default::default()
        }
    }

    /// Build a map holding just an m/z and an intensity array
    pub fn from_mzs_and_intensities(mzs: &[f64], intensities: &[f64]) -> BinaryArrayMap {
        let mut map = Self::new();
        map.add(DataArray::from_values(&ArrayType::MZArray, mzs));
        map.add(DataArray::from_values(&ArrayType::IntensityArray, intensities));
        map
    }

    /// Get the number of arrays in the map
    pub fn len(&self) -> usize {
        self.byte_buffer_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.byte_buffer_map.is_empty()
    }

    /// Iterate over references to the key-value pairs of this map
    pub fn iter(&self) -> Iter<'_, ArrayType, DataArray> {
        self.byte_buffer_map.iter()
    }

    /// Iterate over mutable references to the key-value pairs of this map
    pub fn iter_mut(&mut self) -> IterMut<'_, ArrayType, DataArray> {
        self.byte_buffer_map.iter_mut()
    }

    /// Add a [`DataArray`] to the map by its [`ArrayType`] name, replacing
    /// any array that already had that name.
    pub fn add(&mut self, array: DataArray) {
        if let Some(prev) = self.byte_buffer_map.insert(array.name.clone(), array) {
            warn!("Replaced existing {} array", prev.name);
        }
    }

    /// Get a reference to a specific [`DataArray`] if present
    pub fn get(&self, array_type: &ArrayType) -> Option<&DataArray> {
        self.byte_buffer_map.get(array_type)
    }

    /// Get a mutable reference to a specific [`DataArray`] if present
    pub fn get_mut(&mut self, array_type: &ArrayType) -> Option<&mut DataArray> {
        self.byte_buffer_map.get_mut(array_type)
    }

    /// Check whether a specific [`ArrayType`] is present
    pub fn has_array(&self, array_type: &ArrayType) -> bool {
        self.byte_buffer_map.contains_key(array_type)
    }

    /// Clear the map, discarding any array data
    pub fn clear(&mut self) {
        self.byte_buffer_map.clear();
    }

    pub fn mzs(&'_ self) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        let mz_array = self
            .get(&ArrayType::MZArray)
            .ok_or(ArrayRetrievalError::NotFound(ArrayType::MZArray))?
            .to_f64()?;
        Ok(mz_array)
    }

    /// Access the intensity array, widened to `f64` whatever its stored data type
    pub fn intensities(&'_ self) -> Result<Cow<'_, [f64]>, ArrayRetrievalError> {
        let intensities = self
            .get(&ArrayType::IntensityArray)
            .ok_or(ArrayRetrievalError::NotFound(ArrayType::IntensityArray))?
            .to_f64()?;
        Ok(intensities)
    }

    pub fn charges(&'_ self) -> Result<Cow<'_, [i32]>, ArrayRetrievalError> {
        match self.get(&ArrayType::ChargeArray) {
            Some(data_array) => data_array.to_i32(),
            None => Err(ArrayRetrievalError::NotFound(ArrayType::ChargeArray)),
        }
    }

    /// The number of points described by the arrays, taken from the m/z array
    pub fn point_count(&self) -> Result<usize, ArrayRetrievalError> {
        self.get(&ArrayType::MZArray)
            .map(|arr| arr.len())
            .ok_or(ArrayRetrievalError::NotFound(ArrayType::MZArray))
    }

    /// Verify that every array has the same number of entries as the m/z array
    pub fn check_aligned(&self) -> Result<usize, ArrayRetrievalError> {
        let n = self.point_count()?;
        for (array_type, array) in self.iter() {
            let k = array.len();
            if k != n {
                return Err(ArrayRetrievalError::LengthMismatch {
                    array: array_type.clone(),
                    expected: n,
                    actual: k,
                });
            }
        }
        Ok(n)
    }

    /// Create a new map holding only the points at `indices`, in the order given,
    /// from every array.
    pub fn take(&self, indices: &[usize]) -> Result<BinaryArrayMap, ArrayRetrievalError> {
        self.check_aligned()?;
        let mut subset = IndexMap::with_capacity(self.len());
        for (array_type, array) in self.iter() {
            subset.insert(array_type.clone(), array.take(indices)?);
        }
        Ok(BinaryArrayMap {
            byte_buffer_map: subset,
        })
    }

    /// Reorder all arrays so that the m/z array is in ascending order. Ties keep their
    /// current relative order.
    pub fn sort_by_mz(&mut self) -> Result<(), ArrayRetrievalError> {
        let order = {
            let mzs = self.mzs()?;
            if mzs.windows(2).all(|w| w[0] <= w[1]) {
                return Ok(());
            }
            let mut order: Vec<usize> = (0..mzs.len()).collect();
            order.sort_by(|a, b| mzs[*a].total_cmp(&mzs[*b]));
            order
        };
        *self = self.take(&order)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn make_map() -> BinaryArrayMap {
        let mut map =
            BinaryArrayMap::from_mzs_and_intensities(&[300.0, 100.0, 200.0], &[3.0, 1.0, 2.0]);
        map.add(DataArray::from_values(&ArrayType::ChargeArray, &[3i32, 1, 2]));
        map
    }

    #[test]
    fn test_construction() {
        let mut map = BinaryArrayMap::new();
        assert!(!map.has_array(&ArrayType::MZArray));
        assert!(map.mzs().is_err());
        map.add(DataArray::from_values(&ArrayType::MZArray, &[1.0f64]));
        assert!(map.has_array(&ArrayType::MZArray));
        assert_eq!(map.point_count().unwrap(), 1);
        assert!(matches!(
            map.intensities(),
            Err(ArrayRetrievalError::NotFound(ArrayType::IntensityArray))
        ));
    }

    #[test]
    fn test_take_lock_step() -> Result<(), ArrayRetrievalError> {
        let map = make_map();
        let sub = map.take(&[2, 0])?;
        assert_eq!(sub.mzs()?.as_ref(), &[200.0, 300.0]);
        assert_eq!(sub.intensities()?.as_ref(), &[2.0, 3.0]);
        assert_eq!(sub.charges()?.as_ref(), &[2, 3]);
        let names: Vec<_> = sub.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            names,
            vec![
                ArrayType::MZArray,
                ArrayType::IntensityArray,
                ArrayType::ChargeArray
            ]
        );
        Ok(())
    }

    #[test]
    fn test_sort_by_mz() -> Result<(), ArrayRetrievalError> {
        let mut map = make_map();
        map.sort_by_mz()?;
        assert_eq!(map.mzs()?.as_ref(), &[100.0, 200.0, 300.0]);
        assert_eq!(map.intensities()?.as_ref(), &[1.0, 2.0, 3.0]);
        assert_eq!(map.charges()?.as_ref(), &[1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_misaligned() {
        let mut map = make_map();
        map.add(DataArray::from_values(&ArrayType::ChargeArray, &[1i32]));
        assert_eq!(
            map.take(&[0]),
            Err(ArrayRetrievalError::LengthMismatch {
                array: ArrayType::ChargeArray,
                expected: 3,
                actual: 1
            })
        );
    }
}
