/// How a linear pixel index is turned into a row.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum RowRounding {
    /// `y = ceil(i / width)`. Every index that is not the first of its row lands one row lower,
    /// so `y` ranges over `0..=height`.
    #[default]
    Ceil,
    /// `y = floor(i / width)`, the conventional row.
    Floor,
}

/// Recovers `(x, y)` from linear pixel index `i` in an image `width` pixels wide.
///
/// # Panics
///
/// Panics if `width` is zero.
pub fn pixel_coords(i: usize, width: u32, rows: RowRounding) -> (u32, u32) {
    let width = width as usize;
    let x = i % width;
    let y = match rows {
        RowRounding::Ceil => i.div_ceil(width),
        RowRounding::Floor => i / width,
    };
    (x as u32, y as u32)
}
