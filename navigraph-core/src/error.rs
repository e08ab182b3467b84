//! Error-code plumbing shared by the public error enums, plus the crate-wide
//! result alias.

use crate::hnsw::HnswError;

/// Declares a fieldless code enum alongside `$Err::code()`.
///
/// Each row reads `Code = "STRING" if pattern`, where `pattern` matches the
/// error variants that map to `Code`.
macro_rules! define_error_codes {
    (
        $(#[$meta:meta])*
        $Err:ident => $Code:ident {
            $(
                $(#[$row_meta:meta])*
                $Row:ident = $text:literal if $matcher:pat
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $Code {
            $( $(#[$row_meta])* $Row, )+
        }

        impl $Code {
            /// Stable string form, suitable for logs and exit reports.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$Row => $text, )+
                }
            }
        }

        impl ::core::fmt::Display for $Code {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $Err {
            #[doc = concat!("The [`", stringify!($Code), "`] classifying this error.")]
            #[must_use]
            pub const fn code(&self) -> $Code {
                match self {
                    $( $matcher => $Code::$Row, )+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// Result alias for index operations.
pub type Result<T> = core::result::Result<T, HnswError>;
