//! Helper macro for port error enums.
//!
//! `define_port_error!` derives `thiserror::Error` for the enum and adds one
//! snake_case constructor per variant whose fields accept `impl Into<T>`, so
//! adapters can write `BookRepositoryError::query(err.to_string())`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ShelfPortError {
            Offline => "shelf store offline",
            Unavailable { message: String } => "unavailable: {message}",
            Overfull { count: u32 } => "overfull: {count}",
            Rejected { message: String, count: u32 } => "rejected {count}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ShelfPortError::offline(), ShelfPortError::Offline);
        assert_eq!(ShelfPortError::offline().to_string(), "shelf store offline");
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = ShelfPortError::unavailable("pool exhausted");
        assert_eq!(err.to_string(), "unavailable: pool exhausted");
    }

    #[test]
    fn mixed_fields_keep_declaration_order() {
        let err = ShelfPortError::rejected("duplicate", 2_u32);
        assert_eq!(err.to_string(), "rejected 2: duplicate");
        assert_eq!(ShelfPortError::overfull(7_u32).to_string(), "overfull: 7");
    }
}
