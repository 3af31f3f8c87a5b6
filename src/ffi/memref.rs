//! Memref Descriptors
//!
//! C layouts of the descriptors a lowered `memref` argument is passed as.
//! Bound functions receive a pointer to one of these.

use std::ffi::c_void;
use std::mem;

/// Ranked strided memref descriptor
///
/// ```c
/// struct {
///     T*      allocated;
///     T*      aligned;
///     int64_t offset;
///     int64_t sizes[N];
///     int64_t strides[N];
/// };
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct StridedMemRef<T, const N: usize> {
    pub allocated: *mut T,
    pub aligned: *mut T,
    pub offset: i64,
    pub sizes: [i64; N],
    pub strides: [i64; N],
}

impl<T, const N: usize> StridedMemRef<T, N> {
    /// Describe a contiguous row-major buffer with the given sizes
    ///
    /// Strides saturate instead of overflowing.
    pub fn contiguous(data: *mut T, sizes: [i64; N]) -> Self {
        let mut strides = [0i64; N];
        let mut stride = 1i64;
        for dim in (0..N).rev() {
            strides[dim] = stride;
            stride = stride.saturating_mul(sizes[dim]);
        }
        Self {
            allocated: data,
            aligned: data,
            offset: 0,
            sizes,
            strides,
        }
    }

    /// Total element count, saturating at `usize::MAX`
    pub fn len(&self) -> usize {
        self.sizes.iter().fold(1usize, |acc, &size| {
            let size = usize::try_from(size.max(0)).unwrap_or(usize::MAX);
            acc.saturating_mul(size)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unranked memref descriptor: the rank plus a pointer to a ranked one
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct UnrankedMemRef {
    pub rank: i64,
    pub descriptor: *mut c_void,
}

/// Byte size of a ranked descriptor of `rank` dimensions
pub const fn ranked_descriptor_size(rank: usize) -> usize {
    2 * mem::size_of::<*mut c_void>() + (1 + 2 * rank) * mem::size_of::<i64>()
}

/// Alignment of any ranked descriptor
pub const fn ranked_descriptor_align() -> usize {
    let ptr = mem::align_of::<*mut c_void>();
    let int = mem::align_of::<i64>();
    if ptr > int {
        ptr
    } else {
        int
    }
}
