use num_traits::ToPrimitive;
use serde_json::Value;

/// Coerce a requested index into an integer position.
///
/// `None` means the input has no integer reading and the request is ignored
/// by [`Workflow::set_index`](crate::Workflow::set_index). The returned
/// position is not bounded; clamping happens later.
pub trait IntoIndex {
    fn into_index(self) -> Option<isize>;
}

macro_rules! into_index {
    ($($T:ty),+) => {
        $(
            impl IntoIndex for $T {
                fn into_index(self) -> Option<isize> {
                    ToPrimitive::to_isize(&self)
                }
            }
        )+
    };
}

// Floats truncate toward zero. NaN and values outside isize have no reading.
into_index!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl IntoIndex for &str {
    fn into_index(self) -> Option<isize> {
        parse_int(self)
    }
}

impl IntoIndex for &String {
    fn into_index(self) -> Option<isize> {
        parse_int(self)
    }
}

impl IntoIndex for String {
    fn into_index(self) -> Option<isize> {
        parse_int(&self)
    }
}

impl IntoIndex for &Value {
    fn into_index(self) -> Option<isize> {
        match self {
            Value::Number(n) => n
                .as_i64()
                .and_then(|i| i.to_isize())
                .or_else(|| n.as_f64().and_then(|f| f.to_isize())),
            Value::String(s) => parse_int(s),
            _ => None,
        }
    }
}

impl IntoIndex for Value {
    fn into_index(self) -> Option<isize> {
        (&self).into_index()
    }
}

impl<I: IntoIndex> IntoIndex for Option<I> {
    fn into_index(self) -> Option<isize> {
        self.and_then(IntoIndex::into_index)
    }
}

/// Read the leading decimal integer of `text`, ignoring anything after it.
///
/// Leading whitespace and a single sign are accepted, so `" -12px"` reads as
/// `-12`. Text without a leading digit has no reading.
pub(crate) fn parse_int(text: &str) -> Option<isize> {
    let trimmed = text.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = &trimmed[sign_len..];
    let digit_len = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if digit_len == 0 {
        return None;
    }
    trimmed[..sign_len + digit_len].parse().ok()
}
