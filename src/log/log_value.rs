use std::fmt;

/// One positional argument attached to a [`Record`](crate::log::record::Record).
///
/// The forwarder never interprets these; they are carried through to the sink as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Str(s) => f.write_str(s),
            LogValue::Int(v) => write!(f, "{v}"),
            LogValue::UInt(v) => write!(f, "{v}"),
            LogValue::Float(v) => write!(f, "{v}"),
            LogValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Str(s.to_owned())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Str(s)
    }
}

impl From<bool> for LogValue {
    fn from(v: bool) -> Self {
        LogValue::Bool(v)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for LogValue {
            fn from(v: $t) -> Self {
                LogValue::Int(i64::from(v))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for LogValue {
            fn from(v: $t) -> Self {
                LogValue::UInt(u64::from(v))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for LogValue {
    fn from(v: usize) -> Self {
        LogValue::UInt(u64::try_from(v).unwrap_or(u64::MAX))
    }
}

impl From<f32> for LogValue {
    fn from(v: f32) -> Self {
        LogValue::Float(f64::from(v))
    }
}

impl From<f64> for LogValue {
    fn from(v: f64) -> Self {
        LogValue::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_matching_variant() {
        assert_eq!(LogValue::from("test"), LogValue::Str("test".into()));
        assert_eq!(LogValue::from(0), LogValue::Int(0));
        assert_eq!(LogValue::from(7u16), LogValue::UInt(7));
        assert_eq!(LogValue::from(true), LogValue::Bool(true));
    }

    #[test]
    fn display_renders_bare_value() {
        assert_eq!(LogValue::from("abc").to_string(), "abc");
        assert_eq!(LogValue::from(-3).to_string(), "-3");
        assert_eq!(LogValue::from(1.5).to_string(), "1.5");
    }
}
