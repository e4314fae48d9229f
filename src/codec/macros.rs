//! Declarative record definitions

/// Declare a struct and derive [`FixedRecord`](crate::codec::FixedRecord) for it.
///
/// `SIZE` is the sum of the field sizes and fields are encoded in declaration
/// order, so the layout is fully determined by the struct definition.
///
/// ```
/// postlog::fixed_record! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub struct Posting {
///         pub id: i64,
///         pub date: i64,
///         pub amount: f64,
///     }
/// }
///
/// use postlog::FixedRecord;
/// assert_eq!(Posting::SIZE, 24);
/// ```
#[macro_export]
macro_rules! fixed_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::codec::FixedRecord for $name {
            const SIZE: usize = 0 $( + <$ty as $crate::codec::FixedRecord>::SIZE )*;

            fn encode_into<B: $crate::bytes::BufMut>(&self, buf: &mut B) {
                $( <$ty as $crate::codec::FixedRecord>::encode_into(&self.$field, buf); )*
            }

            fn decode_from<B: $crate::bytes::Buf>(buf: &mut B) -> Self {
                // Struct expression fields evaluate in the order written
                Self {
                    $( $field: <$ty as $crate::codec::FixedRecord>::decode_from(buf), )*
                }
            }
        }
    };
}
