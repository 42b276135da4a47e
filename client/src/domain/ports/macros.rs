//! `define_port_error!`: thiserror enums with snake_case constructors.
//!
//! Every port reports failures through a small closed enum. The macro derives
//! `thiserror::Error` and adds one constructor per variant whose parameters
//! accept anything convertible into the field type, so call sites read
//! `TransportError::status(404_u16, body)`.

macro_rules! define_port_error {
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
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ProbeError {
            Offline => "offline",
            Refused { message: String } => "refused: {message}",
            Status { status: u16, body: String } => "status {status}: {body}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ProbeError::offline(), ProbeError::Offline);
    }

    #[test]
    fn string_fields_accept_str() {
        let err = ProbeError::refused("connection reset");
        assert_eq!(err.to_string(), "refused: connection reset");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = ProbeError::status(502_u16, "bad gateway");
        assert_eq!(err.to_string(), "status 502: bad gateway");
        assert!(matches!(err, ProbeError::Status { status: 502, .. }));
    }
}
