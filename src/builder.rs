use std::ops::Deref;

use tracing::debug;

use crate::bits::BitStream;
use crate::codec::{encode, encode_with_version};
use crate::ec::ecc;
use crate::error::{QrError, QrResult};
use crate::mask::{apply_best_mask, MaskPattern};
use crate::matrix::Matrix;
use crate::metadata::{ECLevel, Version};

// Builder
//------------------------------------------------------------------------------

pub struct QrBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QrBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }
}

impl QrBuilder<'_> {
    pub fn build(&self) -> QrResult<Matrix> {
        if self.data.is_empty() {
            return Err(QrError::InvalidPayload);
        }

        let (encoded_data, version) = match self.version {
            Some(v) => (encode_with_version(self.data, self.ec_level, v)?, v),
            None => encode(self.data, self.ec_level)?,
        };
        debug!(version = %version, ec_level = %self.ec_level, "data encoded");

        let mut payload = BitStream::new(version.total_codewords() << 3);
        let (data_blocks, ecc_blocks) = Self::compute_ecc(encoded_data.data(), version, self.ec_level);
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));

        let mut mat = Matrix::new(version, self.ec_level);
        mat.draw_all_function_patterns();
        mat.draw_encoding_region(&payload);

        let mask = match self.mask {
            Some(m) => {
                mat.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut mat),
        };
        debug!(mask = *mask, dark_modules = mat.count_dark_modules(), "matrix assembled");

        Ok(mat)
    }

    // ECC: Error Correction Codeword generator
    fn compute_ecc(data: &[u8], version: Version, ec_level: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
        let data_blocks = Self::blockify(data, version, ec_level);

        let ecc_size_per_block = version.ecc_per_block(ec_level);
        let ecc_blocks = data_blocks.iter().map(|b| ecc(b, ecc_size_per_block)).collect::<Vec<_>>();

        (data_blocks, ecc_blocks)
    }

    pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
        let (block1_size, block1_count, block2_size, block2_count) =
            version.data_codewords_per_block(ec_level);

        let total_blocks = block1_count + block2_count;
        let total_block1_size = block1_size * block1_count;
        let total_size = total_block1_size + block2_size * block2_count;

        debug_assert!(
            total_size == data.len(),
            "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
            data.len(),
            total_size
        );

        let mut data_blocks = Vec::with_capacity(total_blocks);
        data_blocks.extend(data[..total_block1_size].chunks(block1_size));
        if block2_size > 0 {
            data_blocks.extend(data[total_block1_size..].chunks(block2_size));
        }
        data_blocks
    }

    pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().expect("Blocks is empty");
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}
