//! Serde utility helpers for case-insensitive deserialization

/// Macro to implement case-insensitive deserialization for unit enums
///
/// Usage:
/// ```ignore
/// impl_case_insensitive_deserialize!(
///     MyEnum,
///     Variant1 => "variant1",
///     Variant2 => "variant2"
/// );
/// ```
#[macro_export]
macro_rules! impl_case_insensitive_deserialize {
    ($enum_type:ty, $($variant:ident => $str_val:expr),+ $(,)?) => {
        impl<'de> ::serde::Deserialize<'de> for $enum_type {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let s = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                match s.to_lowercase().replace('-', "_").as_str() {
                    $(
                        $str_val => ::std::result::Result::Ok(Self::$variant),
                    )+
                    _ => ::std::result::Result::Err(::serde::de::Error::custom(::std::format!(
                        "unknown variant '{}', expected one of: {}",
                        s,
                        [$($str_val),+].join(", ")
                    ))),
                }
            }
        }
    };
}
