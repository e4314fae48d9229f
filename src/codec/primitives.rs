//! FixedRecord implementations for numeric primitives and arrays
//!
//! Every width matches the declared bit width exactly; no varints.

use bytes::{Buf, BufMut};

use super::FixedRecord;

macro_rules! impl_fixed_numeric {
    ($($ty:ty => $put:ident, $get:ident;)*) => {
        $(
            impl FixedRecord for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn encode_into<B: BufMut>(&self, buf: &mut B) {
                    buf.$put(*self);
                }

                fn decode_from<B: Buf>(buf: &mut B) -> Self {
                    buf.$get()
                }
            }
        )*
    };
}

impl_fixed_numeric! {
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u16 => put_u16_le, get_u16_le;
    i16 => put_i16_le, get_i16_le;
    u32 => put_u32_le, get_u32_le;
    i32 => put_i32_le, get_i32_le;
    u64 => put_u64_le, get_u64_le;
    i64 => put_i64_le, get_i64_le;
    u128 => put_u128_le, get_u128_le;
    i128 => put_i128_le, get_i128_le;
    f32 => put_f32_le, get_f32_le;
    f64 => put_f64_le, get_f64_le;
}

/// Arrays encode element by element, index 0 first
impl<T: FixedRecord, const N: usize> FixedRecord for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn encode_into<B: BufMut>(&self, buf: &mut B) {
        for item in self {
            item.encode_into(buf);
        }
    }

    fn decode_from<B: Buf>(buf: &mut B) -> Self {
        std::array::from_fn(|_| T::decode_from(buf))
    }
}
