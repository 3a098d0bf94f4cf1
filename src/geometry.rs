use crate::error::SimError;

pub const ADDRESS_BITS: u32 = 32;

/// Validated cache configuration. All bit widths are derived once at
/// construction so decoding is straight mask-and-shift work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    cache_size: u64,
    block_size: u64,
    associativity: u64,
    num_sets: u64,
    offset_bits: u32,
    index_bits: u32,
}

/// One address split into its tag / set index / block offset fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    pub tag: u32,
    pub index: u32,
    pub offset: u32,
}

impl Geometry {
    pub fn new(cache_size: u64, block_size: u64, associativity: u64) -> Result<Geometry, SimError> {
        if cache_size == 0 || !cache_size.is_power_of_two() {
            return Err(SimError::InvalidGeometry(format!(
                "cache size must be a power of 2, got {}",
                cache_size
            )));
        }
        if block_size == 0 || !block_size.is_power_of_two() {
            return Err(SimError::InvalidGeometry(format!(
                "block size must be a power of 2, got {}",
                block_size
            )));
        }
        if block_size > cache_size {
            return Err(SimError::InvalidGeometry(format!(
                "block size {} must be no greater than total cache size {}",
                block_size, cache_size
            )));
        }
        if associativity == 0 {
            return Err(SimError::InvalidGeometry(
                "associativity must be at least 1".to_string(),
            ));
        }

        let num_blocks = cache_size / block_size;
        if num_blocks % associativity != 0 {
            return Err(SimError::InvalidGeometry(format!(
                "associativity {} must divide the block count {}",
                associativity, num_blocks
            )));
        }

        let num_sets = num_blocks / associativity;
        if !num_sets.is_power_of_two() {
            return Err(SimError::InvalidGeometry(format!(
                "set count {} must be a power of 2",
                num_sets
            )));
        }

        let offset_bits = block_size.trailing_zeros();
        let index_bits = num_sets.trailing_zeros();
        if offset_bits + index_bits > ADDRESS_BITS {
            return Err(SimError::InvalidGeometry(format!(
                "index ({} bits) and offset ({} bits) exceed the {}-bit address",
                index_bits, offset_bits, ADDRESS_BITS
            )));
        }

        Ok(Geometry {
            cache_size,
            block_size,
            associativity,
            num_sets,
            offset_bits,
            index_bits,
        })
    }

    /// Direct-mapped is just associativity 1.
    pub fn direct_mapped(cache_size: u64, block_size: u64) -> Result<Geometry, SimError> {
        Geometry::new(cache_size, block_size, 1)
    }

    pub fn cache_size(&self) -> u64 {
        self.cache_size
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn associativity(&self) -> u64 {
        self.associativity
    }

    pub fn num_sets(&self) -> u64 {
        self.num_sets
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    pub fn tag_bits(&self) -> u32 {
        ADDRESS_BITS - self.index_bits - self.offset_bits
    }

    /// Split an address into (tag, index, offset). Pure, total over u32.
    /// Masks are built in u64 so a 32-bit-wide field cannot overflow the shift.
    pub fn decode(&self, address: u32) -> DecodedAddress {
        let addr = address as u64;
        let offset = addr & ((1u64 << self.offset_bits) - 1);
        let index = (addr >> self.offset_bits) & ((1u64 << self.index_bits) - 1);
        let tag = addr >> (self.offset_bits + self.index_bits);
        DecodedAddress {
            tag: tag as u32,
            index: index as u32,
            offset: offset as u32,
        }
    }
}
