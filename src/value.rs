/// Conversion between a typed value and the text tokens it is stored as.
///
/// A raw value is split into tokens with [`ConfigValue::tokens`], and each token is converted on its
/// own. `"10 56 38 52 46"` holds five `i32` tokens; `"azerty"` holds one `String` token but six
/// `char` tokens.
pub trait ConfigValue: Sized {
    /// Human readable name of the target type, used in error messages.
    const EXPECTED: &'static str;

    fn tokens(raw: &str) -> Vec<&str> {
        raw.split_whitespace().collect()
    }

    fn from_token(token: &str) -> Option<Self>;

    fn to_token(&self) -> String;
}

macro_rules! impl_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ConfigValue for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_token(token: &str) -> Option<Self> {
                    token.parse().ok()
                }

                fn to_token(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, String,
);

impl ConfigValue for char {
    const EXPECTED: &'static str = "char";

    // Whitespace is skipped and every remaining character is its own token.
    fn tokens(raw: &str) -> Vec<&str> {
        raw.char_indices()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(i, c)| &raw[i..i + c.len_utf8()])
            .collect()
    }

    fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn to_token(&self) -> String {
        self.to_string()
    }
}
