use super::metadata::Version;

// Function module predicate
//------------------------------------------------------------------------------

// True for finder, separator, timing, alignment, format and version modules,
// including the dark module. Coordinates must be non negative.
pub fn is_function_module(ver: Version, r: i16, c: i16) -> bool {
    let w = ver.width() as i16;
    debug_assert!((0..w).contains(&r) && (0..w).contains(&c), "Out of bounds: {r} {c}");

    // Finders with separators & format areas
    if (r < 9 && c < 9) || (r < 9 && c >= w - 8) || (r >= w - 8 && c < 9) {
        return true;
    }

    // Timing patterns
    if r == 6 || c == 6 {
        return true;
    }

    if ver.has_version_info()
        && ((r < 6 && (w - 11..=w - 9).contains(&c)) || (c < 6 && (w - 11..=w - 9).contains(&r)))
    {
        return true;
    }

    let poses = ver.alignment_pattern();
    let (Some(&first), Some(&last)) = (poses.first(), poses.last()) else {
        return false;
    };
    poses.iter().any(|&ar| {
        (r - ar).abs() <= 2
            && poses.iter().any(|&ac| {
                let overlaps_finder = (ar == first && (ac == first || ac == last))
                    || (ar == last && ac == first);
                !overlaps_finder && (c - ac).abs() <= 2
            })
    })
}

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs from the right edge, alternating upward and downward, and
// yields only the cells not claimed by function patterns
pub struct EncRegionIter {
    ver: Version,
    width: i16,
    // Right column of the current pair
    right: i16,
    // Steps taken along the current pair
    vert: i16,
    // 0 for the right column, 1 for the left
    side: i16,
}

impl EncRegionIter {
    pub fn new(ver: Version) -> Self {
        let width = ver.width() as i16;
        Self { ver, width, right: width - 1, vert: 0, side: 0 }
    }

    fn advance(&mut self) {
        self.side += 1;
        if self.side < 2 {
            return;
        }
        self.side = 0;
        self.vert += 1;
        if self.vert < self.width {
            return;
        }
        self.vert = 0;
        self.right -= 2;
        // Skip the vertical timing column
        if self.right == 6 {
            self.right = 5;
        }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        while self.right >= 1 {
            let upward = (self.right + 1) & 2 == 0;
            let r = if upward { self.width - 1 - self.vert } else { self.vert };
            let c = self.right - self.side;
            self.advance();
            if !is_function_module(self.ver, r, c) {
                return Some((r, c));
            }
        }
        None
    }
}
