// element formatting for the `Vector(..)` print line
// floats follow the default iostream layout: 6 significant digits, shortest of fixed/exponent
use std::fmt;

const SIGNIFICANT_DIGITS: i32 = 6;

/// How a single element is rendered inside a printed `Vector` line.
pub trait FormatElement {
    fn fmt_element(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! format_integer {
    ($($t:ty),*) => {$(
        impl FormatElement for $t {
            fn fmt_element(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{self}")
            }
        }
    )*};
}

format_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! format_float {
    ($($t:ty),*) => {$(
        impl FormatElement for $t {
            fn fmt_element(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&general(f64::from(*self)))
            }
        }
    )*};
}

format_float!(f32, f64);

/// `%g` with the default precision.
fn general(x: f64) -> String {
    if x.is_nan() {
        return if x.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if x.is_infinite() {
        return if x < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // the exponent after rounding to the target digits decides the layout
    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
        trim_zeros(&format!("{x:.decimals$}")).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
