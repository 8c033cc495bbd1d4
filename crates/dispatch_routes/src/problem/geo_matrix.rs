use std::sync::Arc;

use crate::define_index_newtype;

use super::{error::GeoMatrixError, time_window::Minutes};

define_index_newtype!(GeoIdx);

/// Travel times in minutes between every order and the shop.
///
/// This matrix uses a flat structure. Orders occupy indices `0..N` and the
/// shop is the sentinel index `N`; the cell for a pair of locations lives at
/// `from * num_locations + to`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatrix {
    times: Arc<Vec<Minutes>>,
    num_locations: usize,
}

impl GeoMatrix {
    pub fn from_rows(rows: Vec<Vec<Minutes>>) -> Result<Self, GeoMatrixError> {
        let num_locations = rows.len();
        if num_locations == 0 {
            return Err(GeoMatrixError::Empty);
        }

        for (row, values) in rows.iter().enumerate() {
            if values.len() != num_locations {
                return Err(GeoMatrixError::NotSquare {
                    row,
                    len: values.len(),
                    expected: num_locations,
                });
            }
            if let Some(to) = values.iter().position(|&value| value < 0) {
                return Err(GeoMatrixError::NegativeTravelTime { from: row, to });
            }
        }

        Ok(GeoMatrix {
            times: Arc::new(rows.into_iter().flatten().collect()),
            num_locations,
        })
    }

    /// Same travel time between every pair of distinct locations.
    pub fn from_constant(num_locations: usize, time: Minutes) -> Self {
        let mut times = vec![time; num_locations * num_locations];
        for i in 0..num_locations {
            times[i * num_locations + i] = 0;
        }

        GeoMatrix {
            times: Arc::new(times),
            num_locations,
        }
    }

    #[inline(always)]
    fn index(&self, from: GeoIdx, to: GeoIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_time(&self, from: GeoIdx, to: GeoIdx) -> Minutes {
        self.times[self.index(from, to)]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}
