use super::error::LayoutError;

/// Subplot grid dimensions for an a priori unknown number of channels.
///
/// Fewer than four channels stack in a single column. Four or more channels
/// get a square grid, with the channel count rounded up to the next perfect
/// square; the extra cells are left blank by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    pub fn for_channels(n_channels: usize) -> Result<Self, LayoutError> {
        if n_channels == 0 {
            return Err(LayoutError::NoChannels);
        }
        if n_channels < 4 {
            return Ok(Self {
                rows: n_channels,
                cols: 1,
            });
        }
        let dim = (n_channels as f64).sqrt().ceil() as usize;
        Ok(Self {
            rows: dim,
            cols: dim,
        })
    }

    /// Total number of cells in the grid
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of cells that will stay blank for a given channel count
    pub fn padding_slots(&self, n_channels: usize) -> usize {
        self.capacity().saturating_sub(n_channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_channels() {
        assert!(GridLayout::for_channels(0).is_err());
    }

    #[test]
    fn test_single_column_below_four() {
        assert_eq!(
            GridLayout::for_channels(1).unwrap(),
            GridLayout { rows: 1, cols: 1 }
        );
        assert_eq!(
            GridLayout::for_channels(2).unwrap(),
            GridLayout { rows: 2, cols: 1 }
        );
        assert_eq!(
            GridLayout::for_channels(3).unwrap(),
            GridLayout { rows: 3, cols: 1 }
        );
    }

    #[test]
    fn test_padded_square_grids() {
        assert_eq!(
            GridLayout::for_channels(4).unwrap(),
            GridLayout { rows: 2, cols: 2 }
        );
        assert_eq!(
            GridLayout::for_channels(5).unwrap(),
            GridLayout { rows: 3, cols: 3 }
        );
        assert_eq!(
            GridLayout::for_channels(9).unwrap(),
            GridLayout { rows: 3, cols: 3 }
        );
        assert_eq!(
            GridLayout::for_channels(10).unwrap(),
            GridLayout { rows: 4, cols: 4 }
        );
        assert_eq!(
            GridLayout::for_channels(16).unwrap(),
            GridLayout { rows: 4, cols: 4 }
        );
    }

    #[test]
    fn test_padding_slots() {
        let layout = GridLayout::for_channels(5).unwrap();
        assert_eq!(layout.capacity(), 9);
        assert_eq!(layout.padding_slots(5), 4);
    }
}
