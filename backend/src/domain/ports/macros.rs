//! Helper macro for generating domain port error enums.
//!
//! Each port declares its failure modes once; the macro derives the error
//! enum, display messages, and snake_case constructor helpers so adapters
//! build errors without spelling out struct variants.

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
        pub enum SampleGatewayError {
            NotReachable => "gateway not reachable",
            Lookup { message: String } => "lookup failed: {message}",
            Throttled { retry_after_secs: u32 } => "throttled for {retry_after_secs}s",
            Rejected { message: String, status: u16 } => "rejected ({status}): {message}",
        }
    }

    #[test]
    fn unit_variant_constructor_takes_no_arguments() {
        let err = SampleGatewayError::not_reachable();
        assert_eq!(err.to_string(), "gateway not reachable");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SampleGatewayError::lookup("row vanished");
        assert_eq!(err.to_string(), "lookup failed: row vanished");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = SampleGatewayError::throttled(30_u32);
        assert_eq!(err.to_string(), "throttled for 30s");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = SampleGatewayError::rejected("bad payload", 422_u16);
        assert_eq!(err.to_string(), "rejected (422): bad payload");
    }
}
