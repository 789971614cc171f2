//! Two-dimensional scroll value
//!
//! TJA writes scroll speeds and JPOS movements as complex numbers, where the
//! real part is the horizontal component and the imaginary part the vertical
//! one (`1.5`, `2i`, `1+2i`, `-0.5-1i`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::ascii;
use crate::utils::numeric::format_g32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    pub const fn real(re: f32) -> Self {
        Self { re, im: 0.0 }
    }

    /// Parse `re`, `imi`, `re+imi` or `re-imi` (case-insensitive `i`)
    ///
    /// A bare `i`/`+i`/`-i` means a unit imaginary part.
    pub fn parse(input: &str) -> Option<Self> {
        let input = ascii::trim(input);
        if input.is_empty() {
            return None;
        }

        let Some(body) = input.strip_suffix(&['i', 'I'][..]) else {
            return parse_part(input).map(Complex::real);
        };

        // Split at the last sign that is neither leading nor part of an exponent
        let bytes = body.as_bytes();
        let split = (1..bytes.len())
            .rev()
            .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

        match split {
            Some(i) => {
                let re = parse_part(&body[..i])?;
                let im = parse_imaginary(&body[i..])?;
                Some(Complex::new(re, im))
            }
            None => parse_imaginary(body).map(|im| Complex::new(0.0, im)),
        }
    }

    /// Format in the form TJA players accept, dropping zero components
    pub fn to_string_compat(&self) -> String {
        if self.im == 0.0 {
            format_g32(self.re)
        } else if self.re == 0.0 {
            format!("{}i", format_g32(self.im))
        } else if self.im < 0.0 {
            format!("{}{}i", format_g32(self.re), format_g32(self.im))
        } else {
            format!("{}+{}i", format_g32(self.re), format_g32(self.im))
        }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_compat())
    }
}

fn parse_part(s: &str) -> Option<f32> {
    let s = ascii::trim(s);
    let s = s.strip_prefix('+').unwrap_or(s);
    s.parse::<f32>().ok()
}

fn parse_imaginary(s: &str) -> Option<f32> {
    match ascii::trim(s) {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        other => parse_part(other),
    }
}
