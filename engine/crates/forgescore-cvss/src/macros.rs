/// Declare a closed set of metric values with their vector codes.
///
/// Generates the enum, its `MetricValue` impl and `Display`.
macro_rules! metric_value {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::codec::MetricValue for $name {
            const CODES: &'static [&'static str] = &[$($code),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::codec::MetricValue::as_str(self))
            }
        }
    };
}
