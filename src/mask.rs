//! Category filter for id listings.
//!
//! Wire encoding is part of the C contract: bit 0 keyboard, bit 1 palette.

use bitflags::bitflags;

use crate::source::Category;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CategoryMask: u32 {
        const KEYBOARD = 1 << 0;
        const PALETTE  = 1 << 1;
    }
}

impl CategoryMask {
    /// Decode a wire mask. Unknown bits are dropped.
    pub fn from_wire(mask: i32) -> Self {
        Self::from_bits_truncate(mask as u32)
    }

    pub fn to_wire(self) -> i32 {
        self.bits() as i32
    }

    pub fn includes(self, category: Category) -> bool {
        match category {
            Category::Keyboard => self.contains(CategoryMask::KEYBOARD),
            Category::Palette => self.contains(CategoryMask::PALETTE),
            Category::Other => false,
        }
    }
}

impl From<Category> for CategoryMask {
    fn from(category: Category) -> Self {
        match category {
            Category::Keyboard => CategoryMask::KEYBOARD,
            Category::Palette => CategoryMask::PALETTE,
            Category::Other => CategoryMask::empty(),
        }
    }
}
